//! Crop recommendation models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::crop::Season;

/// Individual factor fits (0-1) behind a suitability score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SuitabilityFactors {
    pub texture: Decimal,
    pub moisture: Decimal,
    pub thermal: Decimal,
    pub season: Decimal,
}

/// One ranked crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropRecommendation {
    pub crop_name: String,
    /// 0-100
    pub suitability_score: Decimal,
    pub reason: String,
    pub factors: SuitabilityFactors,
}

/// Ranked recommendations for a field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropRecommendationList {
    pub node_id: String,
    pub season: Season,
    pub recommendations: Vec<CropRecommendation>,
}
