//! Shared types for the city service
//!
//! This crate contains the city record, the request payloads accepted by the
//! HTTP API and the error types shared across the workspace.

pub mod city;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use city::{City, CityId};
pub use error::{CityServiceError, ConfigError, Result, StorageError};
pub use query::{DistrictQuery, FoundationRange, PopulationRange, PopulationUpdate, RegionQuery};
