//! Command line interface

use clap::Parser;
use config::Config;
use std::path::PathBuf;

/// HTTP service over a CSV file of city records
#[derive(Debug, Parser)]
#[command(name = "city-service", version, about)]
pub struct Cli {
    /// Path of the YAML configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.yaml")]
    pub config: PathBuf,

    /// City CSV file, overrides `storage.csv_path`
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Listen port, overrides `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Write a default configuration to the `--config` path and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Cli {
    /// Apply command line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref data) = self.data {
            config.storage.csv_path = data.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
