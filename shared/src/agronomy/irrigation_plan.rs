//! Irrigation depth, run time and decision wording

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AgronomyError, AgronomyResult};
use crate::models::{CropParameters, UrgencyLevel, WaterBalance};
use crate::types::{clamp_decimal, round_half_up};

/// Limits applied to a suggested irrigation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IrrigationLimits {
    pub min_depth_mm: Decimal,
    pub max_depth_mm: Decimal,
    /// Delivery rate of the irrigation system (drip by default)
    pub application_rate_mm_per_hour: Decimal,
}

impl Default for IrrigationLimits {
    fn default() -> Self {
        Self {
            min_depth_mm: Decimal::from(5),
            max_depth_mm: Decimal::from(50),
            application_rate_mm_per_hour: Decimal::from(5),
        }
    }
}

impl IrrigationLimits {
    pub fn validate(&self) -> AgronomyResult<()> {
        if self.min_depth_mm < Decimal::ZERO || self.min_depth_mm > self.max_depth_mm {
            return Err(AgronomyError::InvalidParameters(
                "irrigation depth limits must satisfy 0 <= min <= max".to_string(),
            ));
        }
        if self.application_rate_mm_per_hour <= Decimal::ZERO {
            return Err(AgronomyError::OutOfRange {
                field: "application_rate_mm_per_hour".to_string(),
                value: self.application_rate_mm_per_hour,
            });
        }
        Ok(())
    }
}

/// Depth (mm) needed to bring the root zone from `current_vwc` up to
/// `target_vwc`, clamped to the configured limits. Zero when no irrigation
/// is warranted.
pub fn suggested_depth_mm(
    current_vwc: Decimal,
    target_vwc: Decimal,
    root_depth_cm: Decimal,
    final_level: UrgencyLevel,
    limits: &IrrigationLimits,
) -> Decimal {
    if final_level == UrgencyLevel::None {
        return Decimal::ZERO;
    }
    let deficit = (target_vwc - current_vwc).max(Decimal::ZERO);
    let depth = deficit / Decimal::ONE_HUNDRED * root_depth_cm * Decimal::TEN;
    round_half_up(
        clamp_decimal(depth, limits.min_depth_mm, limits.max_depth_mm),
        1,
    )
}

/// Run time in whole minutes, rounded up
pub fn suggested_duration_min(depth_mm: Decimal, limits: &IrrigationLimits) -> i32 {
    if depth_mm <= Decimal::ZERO || limits.application_rate_mm_per_hour <= Decimal::ZERO {
        return 0;
    }
    (depth_mm / limits.application_rate_mm_per_hour * Decimal::from(60))
        .ceil()
        .to_i32()
        .unwrap_or(i32::MAX)
}

/// Human-readable explanation of a decision
pub fn decision_reason(
    current_vwc: Decimal,
    balance: &WaterBalance,
    crop: &CropParameters,
    final_level: UrgencyLevel,
    weather_note: Option<&str>,
) -> String {
    let mut clauses = Vec::with_capacity(3);

    if current_vwc < crop.vwc_min {
        clauses.push(format!(
            "Soil moisture {}% is {} points below the {} minimum of {}%",
            current_vwc,
            crop.vwc_min - current_vwc,
            crop.name,
            crop.vwc_min
        ));
    } else if current_vwc >= crop.vwc_max {
        clauses.push(format!(
            "Soil moisture {}% is at or above the {} maximum of {}%",
            current_vwc, crop.name, crop.vwc_max
        ));
    } else {
        clauses.push(format!(
            "Soil moisture {}% is within the {} range of {}-{}% (optimal {}%)",
            current_vwc, crop.name, crop.vwc_min, crop.vwc_max, crop.vwc_optimal
        ));
    }

    clauses.push(format!(
        "root-zone depletion {}% of {} mm available water",
        balance.depletion_percent, balance.taw_mm
    ));
    clauses.push(format!("urgency {}", final_level));

    let mut reason = clauses.join("; ");
    if let Some(note) = weather_note {
        reason.push_str(". ");
        reason.push_str(note);
    }
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SoilTexture, StageThresholds, Season};

    fn crop() -> CropParameters {
        CropParameters {
            name: "Test Crop".to_string(),
            base_temperature: Decimal::from(10),
            total_gdd: Decimal::from(1500),
            vwc_min: Decimal::from(25),
            vwc_optimal: Decimal::from(30),
            vwc_max: Decimal::from(35),
            root_depth_cm: Decimal::from(40),
            mad: Decimal::new(5, 1),
            stage_thresholds: StageThresholds::new(15, 40, 75, 100),
            preferred_textures: vec![SoilTexture::SandyLoam],
            season: Season::Kharif,
            up_region_valid: true,
        }
    }

    fn balance() -> WaterBalance {
        WaterBalance {
            taw_mm: Decimal::from(40),
            raw_mm: Decimal::from(20),
            current_depth_mm: Decimal::from(76),
            depletion_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_depth_from_deficit() {
        let limits = IrrigationLimits::default();
        let depth = suggested_depth_mm(
            Decimal::from(19),
            Decimal::from(30),
            Decimal::from(40),
            UrgencyLevel::Critical,
            &limits,
        );
        assert_eq!(depth, Decimal::from(44));
        assert_eq!(suggested_duration_min(depth, &limits), 528);
    }

    #[test]
    fn test_depth_clamped() {
        let limits = IrrigationLimits::default();
        let small = suggested_depth_mm(
            Decimal::new(295, 1),
            Decimal::from(30),
            Decimal::from(40),
            UrgencyLevel::Low,
            &limits,
        );
        assert_eq!(small, Decimal::from(5));

        let large = suggested_depth_mm(
            Decimal::from(5),
            Decimal::from(30),
            Decimal::from(100),
            UrgencyLevel::Critical,
            &limits,
        );
        assert_eq!(large, Decimal::from(50));
    }

    #[test]
    fn test_depth_zero_when_no_urgency() {
        let depth = suggested_depth_mm(
            Decimal::from(19),
            Decimal::from(30),
            Decimal::from(40),
            UrgencyLevel::None,
            &IrrigationLimits::default(),
        );
        assert_eq!(depth, Decimal::ZERO);
        assert_eq!(suggested_duration_min(depth, &IrrigationLimits::default()), 0);
    }

    #[test]
    fn test_duration_rounds_up() {
        // 7 mm at 5 mm/h = 84 min exactly; 7.1 mm = 85.2 -> 86
        let limits = IrrigationLimits::default();
        assert_eq!(suggested_duration_min(Decimal::from(7), &limits), 84);
        assert_eq!(suggested_duration_min(Decimal::new(71, 1), &limits), 86);
    }

    #[test]
    fn test_limits_validate() {
        assert!(IrrigationLimits::default().validate().is_ok());
        let bad = IrrigationLimits {
            application_rate_mm_per_hour: Decimal::ZERO,
            ..IrrigationLimits::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_reason_mentions_deficit_and_weather() {
        let reason = decision_reason(
            Decimal::from(19),
            &balance(),
            &crop(),
            UrgencyLevel::Critical,
            Some("Rain expected"),
        );
        assert!(reason.contains("6 points below"));
        assert!(reason.contains("urgency CRITICAL"));
        assert!(reason.ends_with("Rain expected"));
    }

    #[test]
    fn test_reason_in_range() {
        let reason = decision_reason(Decimal::from(30), &balance(), &crop(), UrgencyLevel::None, None);
        assert!(reason.contains("within the Test Crop range"));
    }
}
