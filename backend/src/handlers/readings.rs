//! HTTP handlers for sensor reading ingest

use axum::{extract::State, http::StatusCode, Json};
use shared::SensorReading;

use crate::error::AppResult;
use crate::services::reading::{IngestReadingInput, ReadingService};
use crate::AppState;

/// Calibrate and store a raw reading
pub async fn ingest_reading(
    State(state): State<AppState>,
    Json(input): Json<IngestReadingInput>,
) -> AppResult<(StatusCode, Json<SensorReading>)> {
    let service = ReadingService::new(state.engine.clone());
    let reading = service.ingest_reading(input).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}
