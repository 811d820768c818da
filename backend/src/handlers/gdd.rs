//! HTTP handlers for growing degree day records

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{DateRange, GddRecord};

use crate::error::AppResult;
use crate::services::gdd::{DailyTemperatureInput, GddService};
use crate::AppState;

/// Query parameters for GDD history (inclusive)
#[derive(Debug, Deserialize)]
pub struct GddRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Get GDD records for a date range
pub async fn get_gdd_history(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
    Query(query): Query<GddRangeQuery>,
) -> AppResult<Json<Vec<GddRecord>>> {
    let service = GddService::new(state.engine.clone());
    let records = service
        .gdd_history(
            &node_id,
            DateRange {
                start: query.start,
                end: query.end,
            },
        )
        .await?;
    Ok(Json(records))
}

/// Record a day's thermal time from explicit temperatures
pub async fn record_daily_gdd(
    State(state): State<AppState>,
    Path((node_id, date)): Path<(String, NaiveDate)>,
    Json(input): Json<DailyTemperatureInput>,
) -> AppResult<Json<GddRecord>> {
    let service = GddService::new(state.engine.clone());
    let record = service.record_daily_temperatures(&node_id, date, input).await?;
    Ok(Json(record))
}

/// Recompute a day's thermal time from its stored readings
pub async fn recompute_daily_gdd(
    State(state): State<AppState>,
    Path((node_id, date)): Path<(String, NaiveDate)>,
) -> AppResult<Json<GddRecord>> {
    let service = GddService::new(state.engine.clone());
    let record = service.recompute_from_readings(&node_id, date).await?;
    Ok(Json(record))
}
