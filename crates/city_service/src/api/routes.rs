//! API route definitions

use crate::api::handlers;
use crate::app::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

/// Create the main API router
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // City endpoints
        .route("/:id", get(handlers::get_city))
        .route("/add/", post(handlers::add_city))
        .route("/del/:id", delete(handlers::delete_city))
        .route("/update/:id", post(handlers::update_population))
        .route("/cities-r/", get(handlers::cities_by_region))
        .route("/cities-d/", get(handlers::cities_by_district))
        .route("/cities-p/", get(handlers::cities_by_population))
        .route("/cities-f/", get(handlers::cities_by_foundation))

        // Health and status endpoints
        .route("/healthz", get(handlers::health_check))
        .route("/status", get(handlers::system_status))

        // Admin endpoints
        .route("/admin/save", post(handlers::save_now))
}
