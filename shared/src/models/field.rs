//! Field configuration models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::gdd::GrowthStage;
use crate::models::soil::SoilTexture;
use crate::types::GpsCoordinates;

/// A monitored field, identified by the sensor node buried in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub node_id: String,
    pub crop_type: Option<String>,
    pub soil_texture: SoilTexture,
    pub sowing_date: Option<NaiveDate>,
    pub crop_confirmed: bool,
    pub current_growth_stage: GrowthStage,
    pub accumulated_gdd: Decimal,
    pub coordinates: GpsCoordinates,
}

impl FieldConfig {
    /// The confirmed crop, if the field has an active crop cycle
    pub fn active_crop(&self) -> Option<&str> {
        if self.crop_confirmed {
            self.crop_type.as_deref()
        } else {
            None
        }
    }
}
