//! Thermal time (growing degree day) models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AgronomyError;

/// Crop growth stages in development order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthStage {
    #[default]
    Initial,
    Development,
    MidSeason,
    LateSeason,
    HarvestReady,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Initial => "INITIAL",
            GrowthStage::Development => "DEVELOPMENT",
            GrowthStage::MidSeason => "MID_SEASON",
            GrowthStage::LateSeason => "LATE_SEASON",
            GrowthStage::HarvestReady => "HARVEST_READY",
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GrowthStage {
    type Err = AgronomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INITIAL" => Ok(GrowthStage::Initial),
            "DEVELOPMENT" => Ok(GrowthStage::Development),
            "MID_SEASON" => Ok(GrowthStage::MidSeason),
            "LATE_SEASON" => Ok(GrowthStage::LateSeason),
            "HARVEST_READY" => Ok(GrowthStage::HarvestReady),
            _ => Err(AgronomyError::UnknownGrowthStage(s.to_string())),
        }
    }
}

/// Daily temperature aggregate feeding the GDD calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyTemperature {
    pub avg_celsius: Decimal,
    pub min_celsius: Decimal,
    pub max_celsius: Decimal,
    pub reading_count: i32,
}

/// Thermal time for one field on one calendar date.
///
/// Unique per `(node_id, record_date)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GddRecord {
    pub node_id: String,
    pub record_date: NaiveDate,
    pub avg_temperature: Decimal,
    pub min_temperature: Decimal,
    pub max_temperature: Decimal,
    pub reading_count: i32,
    pub daily_gdd: Decimal,
    pub cumulative_gdd: Decimal,
    pub crop_type: String,
    pub base_temperature: Decimal,
    pub growth_stage: GrowthStage,
}

/// Current crop development state of a field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSnapshot {
    pub node_id: String,
    pub crop_type: String,
    pub sowing_date: Option<NaiveDate>,
    pub days_since_sowing: Option<i64>,
    pub accumulated_gdd: Decimal,
    pub total_gdd_required: Decimal,
    pub progress_percent: Decimal,
    pub gdd_remaining: Decimal,
    pub growth_stage: GrowthStage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_total_order() {
        assert!(GrowthStage::Initial < GrowthStage::Development);
        assert!(GrowthStage::Development < GrowthStage::MidSeason);
        assert!(GrowthStage::MidSeason < GrowthStage::LateSeason);
        assert!(GrowthStage::LateSeason < GrowthStage::HarvestReady);
    }

    #[test]
    fn test_stage_parse_round_trip() {
        for stage in [
            GrowthStage::Initial,
            GrowthStage::Development,
            GrowthStage::MidSeason,
            GrowthStage::LateSeason,
            GrowthStage::HarvestReady,
        ] {
            assert_eq!(stage.as_str().parse::<GrowthStage>().unwrap(), stage);
        }
        assert!("FLOWERING".parse::<GrowthStage>().is_err());
    }
}
