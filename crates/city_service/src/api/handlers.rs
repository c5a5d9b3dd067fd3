//! HTTP API request handlers
//!
//! City handlers answer in plain text. A lookup that matches nothing is not
//! an error: the response is `200` with an empty body.

use crate::api::error::ApiError;
use crate::app::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use types::{
    City, CityId, CityServiceError, DistrictQuery, FoundationRange, PopulationRange, PopulationUpdate, RegionQuery,
};

type TextResponse = Result<(StatusCode, String), ApiError>;

/// Decode a JSON body regardless of the request content type
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| CityServiceError::BadRequest(e.to_string()).into())
}

fn city_id(path: Result<Path<CityId>, PathRejection>) -> Result<CityId, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| CityServiceError::BadRequest(rejection.body_text()).into())
}

/// One line per city, each terminated by a newline
fn listing<'a>(cities: impl IntoIterator<Item = &'a City>, line: impl Fn(&City) -> String) -> String {
    cities.into_iter().map(|c| line(c) + "\n").collect()
}

/// `GET /{id}`
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CityId>, PathRejection>,
) -> TextResponse {
    let id = city_id(path)?;
    let store = state.store.read().await;

    match store.get_by_id(id) {
        Some(city) => Ok((StatusCode::OK, format!("City with id {}: {}", id, city.name))),
        None => {
            tracing::debug!(city_id = id, "No city with this id");
            Ok((StatusCode::OK, String::new()))
        }
    }
}

/// `POST /add/`
pub async fn add_city(State(state): State<Arc<AppState>>, body: Bytes) -> TextResponse {
    let city: City = decode_body(&body)?;
    let message = format!("City {} added", city.name);

    tracing::info!(city_id = city.id, city_name = %city.name, "Adding city");
    state.store.write().await.add(city);

    Ok((StatusCode::CREATED, message))
}

/// `DELETE /del/{id}`
pub async fn delete_city(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CityId>, PathRejection>,
) -> TextResponse {
    let id = city_id(path)?;

    match state.store.write().await.delete_by_id(id) {
        Some(city) => {
            tracing::info!(city_id = id, city_name = %city.name, "City deleted");
            Ok((StatusCode::OK, format!("City {} deleted", city.name)))
        }
        None => {
            tracing::debug!(city_id = id, "Delete matched no city");
            Ok((StatusCode::OK, String::new()))
        }
    }
}

/// `POST /update/{id}`
pub async fn update_population(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CityId>, PathRejection>,
    body: Bytes,
) -> TextResponse {
    let update: PopulationUpdate = decode_body(&body)?;
    let id = city_id(path)?;

    let mut store = state.store.write().await;
    match store.update_population_by_id(id, update.population) {
        Some(city) => {
            tracing::info!(city_id = id, city_name = %city.name, population = update.population, "Population updated");
            Ok((StatusCode::OK, format!("Population of city {} updated", city.name)))
        }
        None => {
            tracing::debug!(city_id = id, "Update matched no city");
            Ok((StatusCode::OK, String::new()))
        }
    }
}

/// `GET /cities-r/`
pub async fn cities_by_region(State(state): State<Arc<AppState>>, body: Bytes) -> TextResponse {
    let query: RegionQuery = decode_body(&body)?;
    let store = state.store.read().await;

    let text = listing(store.filter_by_region(&query.region), |c| {
        format!("City in {}: {}", query.region, c.name)
    });
    Ok((StatusCode::OK, text))
}

/// `GET /cities-d/`
pub async fn cities_by_district(State(state): State<Arc<AppState>>, body: Bytes) -> TextResponse {
    let query: DistrictQuery = decode_body(&body)?;
    let store = state.store.read().await;

    let text = listing(store.filter_by_district(&query.district), |c| {
        format!("City in {}: {}", query.district, c.name)
    });
    Ok((StatusCode::OK, text))
}

/// `GET /cities-p/`
pub async fn cities_by_population(State(state): State<Arc<AppState>>, body: Bytes) -> TextResponse {
    let range: PopulationRange = decode_body(&body)?;
    let store = state.store.read().await;

    let text = listing(store.filter_by_population_range(range.min, range.max), |c| {
        format!("City with population {} - {}: {}", range.min, range.max, c.name)
    });
    Ok((StatusCode::OK, text))
}

/// `GET /cities-f/`
pub async fn cities_by_foundation(State(state): State<Arc<AppState>>, body: Bytes) -> TextResponse {
    let range: FoundationRange = decode_body(&body)?;
    let store = state.store.read().await;

    let text = listing(store.filter_by_foundation_range(range.min, range.max), |c| {
        format!("City founded {} - {}: {}", range.min, range.max, c.name)
    });
    Ok((StatusCode::OK, text))
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let count = state.store.read().await.len();

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "components": {
                "store": {
                    "status": "healthy",
                    "cities": count
                }
            }
        })),
    )
}

/// System status endpoint with more detailed information
pub async fn system_status(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let count = state.store.read().await.len();
    let uptime = chrono::Utc::now() - state.started_at;

    (
        StatusCode::OK,
        Json(json!({
            "service": "city-service",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "operational",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_seconds": uptime.num_seconds(),
            "components": {
                "store": {
                    "cities": count,
                    "source": state.storage.location()
                },
                "autosave": {
                    "interval_seconds": state.config.storage.autosave_interval_seconds
                }
            }
        })),
    )
}

/// Persist the store immediately (admin endpoint)
pub async fn save_now(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let count = state.persist().await?;
    tracing::info!(count, path = %state.storage.location(), "Cities saved on request");

    Ok((
        StatusCode::OK,
        Json(json!({
            "saved": count,
            "path": state.storage.location(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    ))
}
