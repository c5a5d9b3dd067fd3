//! City record

use serde::{Deserialize, Serialize};

/// Identifier of a city record. Uniqueness is assumed, never enforced.
pub type CityId = i64;

/// A single row of the city dataset
///
/// Missing JSON fields decode to their zero value, so a partial body such as
/// `{"name": "Tula"}` is accepted as a city with id 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct City {
    /// Record identifier
    pub id: CityId,
    /// City name
    pub name: String,
    /// Region (oblast, krai, republic) the city belongs to
    pub region: String,
    /// Federal district
    pub district: String,
    /// Number of inhabitants
    pub population: i64,
    /// Year of foundation
    pub foundation: i64,
}

impl City {
    /// Create a new city record
    pub fn new(
        id: CityId,
        name: impl Into<String>,
        region: impl Into<String>,
        district: impl Into<String>,
        population: i64,
        foundation: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            region: region.into(),
            district: district.into(),
            population,
            foundation,
        }
    }

    /// Whether the population lies within `min..=max`
    pub fn population_between(&self, min: i64, max: i64) -> bool {
        self.population >= min && self.population <= max
    }

    /// Whether the foundation year lies within `min..=max`
    pub fn founded_between(&self, min: i64, max: i64) -> bool {
        self.foundation >= min && self.foundation <= max
    }
}
