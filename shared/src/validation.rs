//! Validation utilities for inbound field data
//!
//! These checks run at the edge (HTTP payloads, WASM calls) before any
//! calculation is invoked.

use rust_decimal::Decimal;

use crate::models::{CropParameters, StageThresholds};

/// Longest node identifier a sensor firmware can report
pub const MAX_NODE_ID_LEN: usize = 64;

/// Longest rain lookahead accepted, hours (the provider forecasts 5 days)
pub const MAX_LOOKAHEAD_HOURS: i64 = 120;

// ============================================================================
// Sensor Node Validations
// ============================================================================

/// Validate node identifier format (1-64 chars of ASCII alphanumerics, `-`, `_`)
pub fn validate_node_id(node_id: &str) -> Result<(), &'static str> {
    if node_id.is_empty() {
        return Err("Node id must not be empty");
    }
    if node_id.len() > MAX_NODE_ID_LEN {
        return Err("Node id must be at most 64 characters");
    }
    if !node_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("Node id may only contain letters, digits, '-' and '_'");
    }
    Ok(())
}

/// Raw ADC counts are never negative; values above the sensor's maximum are
/// clamped during calibration rather than rejected.
pub fn validate_raw_count(raw_count: i32) -> Result<(), &'static str> {
    if raw_count < 0 {
        return Err("Raw sensor count cannot be negative");
    }
    Ok(())
}

/// Validate a volumetric water content percentage
pub fn validate_vwc(vwc_percent: Decimal) -> Result<(), &'static str> {
    if vwc_percent < Decimal::ZERO || vwc_percent > Decimal::ONE_HUNDRED {
        return Err("VWC must be between 0 and 100%");
    }
    Ok(())
}

// ============================================================================
// Location & Weather Validations
// ============================================================================

/// Validate latitude/longitude bounds
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a rain lookahead window
pub fn validate_lookahead_hours(hours: i64) -> Result<(), &'static str> {
    if hours <= 0 {
        return Err("Lookahead must be a positive number of hours");
    }
    if hours > MAX_LOOKAHEAD_HOURS {
        return Err("Lookahead cannot exceed the 120 hour forecast horizon");
    }
    Ok(())
}

// ============================================================================
// Crop Validations
// ============================================================================

/// Validate management allowable depletion fraction
pub fn validate_mad(mad: Decimal) -> Result<(), &'static str> {
    if mad < Decimal::ZERO || mad > Decimal::ONE {
        return Err("MAD must be a fraction between 0 and 1");
    }
    Ok(())
}

/// Validate a crop's VWC tolerance band: min <= optimal <= max with a
/// non-empty `[min, max)` interval
pub fn validate_vwc_band(crop: &CropParameters) -> Result<(), &'static str> {
    if crop.vwc_min > crop.vwc_optimal || crop.vwc_optimal > crop.vwc_max {
        return Err("Crop VWC band must satisfy min <= optimal <= max");
    }
    if crop.vwc_min >= crop.vwc_max {
        return Err("Crop VWC band must be wider than a single value");
    }
    validate_vwc(crop.vwc_min)?;
    validate_vwc(crop.vwc_max)
}

/// Validate growth stage boundaries are strictly increasing within 0-100%
pub fn validate_stage_thresholds(thresholds: &StageThresholds) -> Result<(), &'static str> {
    let ordered = Decimal::ZERO < thresholds.initial_end
        && thresholds.initial_end < thresholds.development_end
        && thresholds.development_end < thresholds.mid_season_end
        && thresholds.mid_season_end < thresholds.late_season_end
        && thresholds.late_season_end <= Decimal::ONE_HUNDRED;
    if !ordered {
        return Err("Stage thresholds must be strictly increasing within 0-100%");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::find_default_crop;

    // ========================================================================
    // Sensor Node Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_node_id() {
        assert!(validate_node_id("node-01").is_ok());
        assert!(validate_node_id("LKO_field_7").is_ok());
        assert!(validate_node_id("").is_err());
        assert!(validate_node_id("node 01").is_err());
        assert!(validate_node_id(&"n".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_raw_count() {
        assert!(validate_raw_count(0).is_ok());
        assert!(validate_raw_count(2048).is_ok());
        assert!(validate_raw_count(-1).is_err());
    }

    #[test]
    fn test_validate_vwc() {
        assert!(validate_vwc(Decimal::ZERO).is_ok());
        assert!(validate_vwc(Decimal::ONE_HUNDRED).is_ok());
        assert!(validate_vwc(Decimal::from(-1)).is_err());
        assert!(validate_vwc(Decimal::from(101)).is_err());
    }

    // ========================================================================
    // Location Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(Decimal::new(2685, 2), Decimal::new(8095, 2)).is_ok());
        assert!(validate_coordinates(Decimal::from(91), Decimal::ZERO).is_err());
        assert!(validate_coordinates(Decimal::ZERO, Decimal::from(-181)).is_err());
    }

    #[test]
    fn test_validate_lookahead_hours() {
        assert!(validate_lookahead_hours(48).is_ok());
        assert!(validate_lookahead_hours(0).is_err());
        assert!(validate_lookahead_hours(121).is_err());
    }

    // ========================================================================
    // Crop Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_mad() {
        assert!(validate_mad(Decimal::new(5, 1)).is_ok());
        assert!(validate_mad(Decimal::new(11, 1)).is_err());
    }

    #[test]
    fn test_catalog_bands_are_ordered() {
        let wheat = find_default_crop("wheat").unwrap();
        assert!(validate_vwc_band(&wheat).is_ok());

        let mut broken = wheat;
        broken.vwc_optimal = broken.vwc_max + Decimal::ONE;
        assert!(validate_vwc_band(&broken).is_err());
    }

    #[test]
    fn test_single_value_band_rejected() {
        let mut flat = find_default_crop("wheat").unwrap();
        flat.vwc_min = Decimal::from(28);
        flat.vwc_optimal = Decimal::from(28);
        flat.vwc_max = Decimal::from(28);
        assert!(validate_vwc_band(&flat).is_err());
    }

    #[test]
    fn test_validate_stage_thresholds() {
        assert!(validate_stage_thresholds(&StageThresholds::new(15, 40, 75, 100)).is_ok());
        assert!(validate_stage_thresholds(&StageThresholds::new(40, 15, 75, 100)).is_err());
        assert!(validate_stage_thresholds(&StageThresholds::new(0, 40, 75, 100)).is_err());
        assert!(validate_stage_thresholds(&StageThresholds::new(15, 40, 75, 120)).is_err());
    }
}
