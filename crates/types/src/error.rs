//! Error types for the city service

use thiserror::Error;

/// Main error type for the city service
#[derive(Error, Debug)]
pub enum CityServiceError {
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Request decoding errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for city service operations
pub type Result<T> = std::result::Result<T, CityServiceError>;

/// CSV persistence errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// File could not be opened, created or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reader or writer failure inside the CSV codec
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record does not carry the six fixed columns
    #[error("Malformed record on line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Configuration specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Parse error
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },
}
