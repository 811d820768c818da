//! Route definitions for the AgroSense API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/readings", post(handlers::ingest_reading))
        .route("/irrigation/batch", post(handlers::decide_batch))
        .nest("/fields", field_routes())
        .nest("/weather", weather_routes())
}

/// Per-field routes, keyed by sensor node id
fn field_routes() -> Router<AppState> {
    Router::new()
        .route("/:node_id/crop", put(handlers::confirm_crop))
        .route("/:node_id/growth", get(handlers::get_growth))
        .route("/:node_id/irrigation", get(handlers::get_irrigation_decision))
        .route(
            "/:node_id/crop-recommendations",
            get(handlers::get_crop_recommendations),
        )
        .route("/:node_id/gdd", get(handlers::get_gdd_history))
        .route("/:node_id/gdd/:date", put(handlers::record_daily_gdd))
        .route(
            "/:node_id/gdd/:date/recompute",
            post(handlers::recompute_daily_gdd),
        )
}

/// Weather lookup routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(handlers::get_forecast))
        .route("/rain", get(handlers::check_rain))
        .route("/et", get(handlers::get_daily_et))
}
