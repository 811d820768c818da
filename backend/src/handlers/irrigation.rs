//! HTTP handlers for irrigation decisions

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::IrrigationDecision;

use crate::error::{AppError, AppResult};
use crate::services::irrigation::{BatchOutcome, IrrigationService};
use crate::AppState;

/// Request body for a batch decision run
#[derive(Debug, Deserialize)]
pub struct BatchDecisionRequest {
    pub node_ids: Vec<String>,
}

/// Decide whether a field needs irrigation now
pub async fn get_irrigation_decision(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> AppResult<Json<IrrigationDecision>> {
    let service = IrrigationService::new(state.engine.clone());
    let decision = service.decide(&node_id).await?;
    Ok(Json(decision))
}

/// Decide for many fields, most urgent first
pub async fn decide_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchDecisionRequest>,
) -> AppResult<Json<BatchOutcome>> {
    if request.node_ids.is_empty() {
        return Err(AppError::validation("node_ids", "At least one node id is required"));
    }
    let service = IrrigationService::new(state.engine.clone());
    Ok(Json(service.decide_batch(&request.node_ids).await))
}
