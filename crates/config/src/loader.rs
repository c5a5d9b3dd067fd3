//! Configuration loader implementation

use crate::schema::Config;
use crate::validation::ConfigValidator;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::Path;
use types::ConfigError;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "CITY_SERVICE_";

/// Configuration loader that handles YAML files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let config_path = config_path.as_ref();

        // Check if config file exists
        if !config_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: config_path.display().to_string(),
            }
            .into());
        }

        let config: Config = Self::base()
            .merge(Yaml::file(config_path))
            // Override with environment variables (e.g. CITY_SERVICE_SERVER__PORT)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse configuration")?;

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from defaults and environment variables only
    pub fn from_env() -> Result<Config> {
        let config: Config = Self::base()
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse configuration from environment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<Config> {
        let config: Config = Self::base()
            .merge(Yaml::string(yaml_content))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse configuration from string")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    /// Reject configurations whose report carries errors
    fn validate(config: &Config) -> Result<()> {
        let report = ConfigValidator::validate(config);
        if let Some(issue) = report.errors.first() {
            return Err(ConfigError::ValidationError {
                field: issue.field.clone(),
                message: issue.message.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Get default configuration
    pub fn default() -> Config {
        Config::default()
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let yaml_content = serde_yaml::to_string(&config)
            .context("Failed to serialize default configuration")?;

        std::fs::write(path.as_ref(), yaml_content)
            .context("Failed to write example configuration file")?;

        Ok(())
    }
}
