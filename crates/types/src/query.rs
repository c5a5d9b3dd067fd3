//! Request payloads accepted by the HTTP API

use serde::{Deserialize, Serialize};

/// Body of `POST /update/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationUpdate {
    pub population: i64,
}

/// Body of `GET /cities-r/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionQuery {
    pub region: String,
}

/// Body of `GET /cities-d/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistrictQuery {
    pub district: String,
}

/// Body of `GET /cities-p/`, bounds inclusive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationRange {
    #[serde(rename = "pmin")]
    pub min: i64,
    #[serde(rename = "pmax")]
    pub max: i64,
}

/// Body of `GET /cities-f/`, bounds inclusive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationRange {
    #[serde(rename = "fmin")]
    pub min: i64,
    #[serde(rename = "fmax")]
    pub max: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_wire_names() {
        let range: PopulationRange = serde_json::from_str(r#"{"pmin": 10, "pmax": 20}"#).unwrap();
        assert_eq!((range.min, range.max), (10, 20));

        let range: FoundationRange = serde_json::from_str(r#"{"fmin": 1100, "fmax": 1500}"#).unwrap();
        assert_eq!((range.min, range.max), (1100, 1500));
    }

    #[test]
    fn test_missing_fields_default() {
        let update: PopulationUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update.population, 0);

        let query: RegionQuery = serde_json::from_str("{}").unwrap();
        assert!(query.region.is_empty());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(serde_json::from_str::<PopulationUpdate>(r#"{"population": "many"}"#).is_err());
    }
}
