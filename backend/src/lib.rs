//! AgroSense decision engine - backend library
//!
//! Turns soil sensor readings, crop parameters and weather forecasts into
//! irrigation decisions, growth-stage tracking and crop recommendations.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::{Config, EngineSettings};
pub use error::{AppError, AppResult};
pub use services::EngineContext;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when the engine runs without a database
    pub db: Option<sqlx::PgPool>,
    pub engine: Arc<EngineContext>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AgroSense Decision Engine API v1.0"
}
