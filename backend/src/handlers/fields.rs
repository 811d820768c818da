//! HTTP handlers for field crop cycles

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{FieldConfig, GrowthSnapshot};

use crate::error::AppResult;
use crate::services::field::{ConfirmCropInput, FieldService};
use crate::services::GddService;
use crate::AppState;

/// Confirm the crop planted in a field, starting a new crop cycle
pub async fn confirm_crop(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
    Json(input): Json<ConfirmCropInput>,
) -> AppResult<Json<FieldConfig>> {
    let service = FieldService::new(state.engine.clone());
    let field = service.confirm_crop(&node_id, input).await?;
    Ok(Json(field))
}

/// Current growth stage and thermal-time progress
pub async fn get_growth(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> AppResult<Json<GrowthSnapshot>> {
    let service = GddService::new(state.engine.clone());
    let snapshot = service.growth_snapshot(&node_id).await?;
    Ok(Json(snapshot))
}
