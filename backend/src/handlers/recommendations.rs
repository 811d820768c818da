//! HTTP handlers for crop recommendations

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::CropRecommendationList;

use crate::error::AppResult;
use crate::services::CropRecommendationService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub top_n: Option<usize>,
}

/// Rank the crop catalog for a field
pub async fn get_crop_recommendations(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<CropRecommendationList>> {
    let service = CropRecommendationService::new(state.engine.clone());
    let list = service.recommend(&node_id, query.top_n).await?;
    Ok(Json(list))
}
