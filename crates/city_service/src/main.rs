//! City Service - Main Application Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use config::{ConfigLoader, ConfigValidator, LoggingConfig};
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod cli;
mod scheduler;
mod storage;

use app::Application;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if it exists
    let dotenv_result = dotenv::dotenv();

    if cli.init_config {
        init_logging(&LoggingConfig::default())?;
        ConfigLoader::create_example(&cli.config)
            .with_context(|| format!("Failed to write {}", cli.config.display()))?;
        info!("Example configuration written to {}", cli.config.display());
        return Ok(());
    }

    // Load configuration
    let config_file_found = cli.config.exists();
    let loaded = if config_file_found {
        ConfigLoader::load(&cli.config)
    } else {
        ConfigLoader::from_env()
    };
    let mut config = loaded.context("Failed to load configuration")?;
    cli.apply(&mut config);

    // Initialize logging
    init_logging(&config.logging)?;

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if !e.not_found() => warn!("Could not load .env file: {}", e),
        Err(_) => {}
    }

    info!("Starting City Service v{}", env!("CARGO_PKG_VERSION"));
    if config_file_found {
        info!("Configuration loaded from: {}", cli.config.display());
    } else {
        warn!("Configuration file {} not found, using defaults and environment", cli.config.display());
    }

    let report = ConfigValidator::validate(&config);
    for issue in &report.warnings {
        warn!(field = %issue.field, "{}", issue.message);
    }
    if report.has_errors() {
        for issue in &report.errors {
            error!(field = %issue.field, "{}", issue.message);
        }
        anyhow::bail!("Invalid configuration after command line overrides: {}", report.summary());
    }

    info!("Data file: {}", config.storage.csv_path.display());

    // Create and run the application
    let mut app = Application::new(config)
        .await
        .context("Failed to create application")?;

    info!("Application starting...");
    if let Err(e) = app.run(shutdown_signal()).await {
        error!("Application error: {:#}", e);
        return Err(e);
    }

    info!("City Service shutdown complete");
    Ok(())
}

/// Resolve on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Initialize logging from configuration; `RUST_LOG` and `LOG_FORMAT` take precedence
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| logging.level.clone());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    info!("Logging initialized");
    info!("Log level: {}", log_level);
    info!("Log format: {}", log_format);

    if log_level == "trace" || log_level == "debug" {
        warn!("Debug/trace logging enabled - may impact performance in production");
    }

    Ok(())
}
