//! Common types used across the platform

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Coordinates rounded to 2 decimal places (~1 km), used as a cache key
    pub fn cache_key(&self) -> (Decimal, Decimal) {
        (round_half_up(self.latitude, 2), round_half_up(self.longitude, 2))
    }

    pub fn is_southern_hemisphere(&self) -> bool {
        self.latitude < Decimal::ZERO
    }
}

/// Date range for queries (inclusive on both ends)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

/// Round half away from zero, the way field agronomists round by hand.
///
/// `Decimal::round_dp` uses banker's rounding, which would report 12.345 as
/// 12.34.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a value into `[min, max]`
pub fn clamp_decimal(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    value.max(min).min(max)
}
