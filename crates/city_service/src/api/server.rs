//! HTTP API server implementation

use crate::api::routes;
use crate::app::AppState;
use anyhow::{Context, Result};
use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

/// HTTP API server
pub struct ApiServer {
    app: Router,
    addr: SocketAddr,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(state: Arc<AppState>) -> Result<Self> {
        let config = &state.config;

        // Parse server address
        let addr: SocketAddr = config
            .server
            .bind_address()
            .parse()
            .context("Invalid server host/port configuration")?;

        let mut app = routes::create_routes()
            .layer(TimeoutLayer::new(config.server.request_timeout()));

        if config.logging.request_logging {
            app = app.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            );
        }

        if config.server.cors_enabled {
            app = app.layer(CorsLayer::permissive());
        }

        let app = app.with_state(state);

        info!("API server configured for {}", addr);

        Ok(Self { app, addr })
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind to server address {}", self.addr))?;

        info!("API server listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    /// Router with all layers and state applied
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Serve until `shutdown` is cancelled, then drain open connections
    pub async fn serve(app: Router, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .context("API server error")?;

        info!("API server stopped accepting connections");
        Ok(())
    }
}
