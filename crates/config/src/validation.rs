//! Configuration validation utilities

use crate::schema::Config;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate complete configuration
    pub fn validate(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_server(config, &mut report);
        Self::validate_storage(config, &mut report);
        Self::validate_logging(config, &mut report);

        report
    }

    fn validate_server(config: &Config, report: &mut ValidationReport) {
        if config.server.port == 0 {
            report.add_error("server.port", "Server port cannot be 0");
        } else if config.server.port < 1024 {
            report.add_warning("server.port", "Server port is below 1024, may require elevated privileges");
        }

        if config.server.host.is_empty() {
            report.add_error("server.host", "Server host cannot be empty");
        }

        if config.server.request_timeout_seconds == 0 {
            report.add_error("server.request_timeout_seconds", "Request timeout cannot be 0");
        } else if config.server.request_timeout_seconds > 300 {
            report.add_warning("server.request_timeout_seconds", "Request timeout is very high");
        }

        if config.server.shutdown_grace_seconds == 0 {
            report.add_error("server.shutdown_grace_seconds", "Shutdown grace period cannot be 0");
        } else if config.server.shutdown_grace_seconds > 60 {
            report.add_warning("server.shutdown_grace_seconds", "Shutdown grace period is longer than a minute");
        }
    }

    fn validate_storage(config: &Config, report: &mut ValidationReport) {
        let path = &config.storage.csv_path;
        if path.as_os_str().is_empty() {
            report.add_error("storage.csv_path", "CSV path cannot be empty");
        } else if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                report.add_warning("storage.csv_path", "CSV file directory does not exist, saving will fail");
            }
        }

        match config.storage.autosave_interval_seconds {
            Some(0) => {
                report.add_error("storage.autosave_interval_seconds", "Autosave interval cannot be 0");
            }
            Some(secs) if secs < 5 => {
                report.add_warning("storage.autosave_interval_seconds", "Autosave interval is very low, the file will be rewritten constantly");
            }
            _ => {}
        }
    }

    fn validate_logging(config: &Config, report: &mut ValidationReport) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.as_str()) {
            report.add_error("logging.level", &format!("Invalid log level: {}. Valid levels: {:?}", config.logging.level, valid_levels));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&config.logging.format.as_str()) {
            report.add_error("logging.format", &format!("Invalid log format: {}. Valid formats: {:?}", config.logging.format, valid_formats));
        }

        if config.logging.level == "trace" || config.logging.level == "debug" {
            report.add_warning("logging.level", "Debug/trace logging may impact performance in production");
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
