//! Weather forecast models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Multi-day forecast for a location, one row per calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherForecast {
    pub location: GpsCoordinates,
    /// Ordered by ascending date
    pub days: Vec<DailyForecast>,
}

/// Daily weather aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_max_celsius: Decimal,
    pub temp_min_celsius: Decimal,
    pub temp_avg_celsius: Decimal,
    pub humidity_percent: Decimal,
    pub precipitation_mm: Decimal,
    pub description: String,
}

/// One raw (hourly or 3-hourly) provider forecast entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: Decimal,
    pub temp_min_celsius: Decimal,
    pub temp_max_celsius: Decimal,
    pub humidity_percent: Decimal,
    pub precipitation_mm: Decimal,
    pub description: String,
}

/// A forecast as held in the forecast cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedForecast {
    pub forecast: WeatherForecast,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedForecast {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Result of a rain check over a lookahead window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RainOutlook {
    pub expected: bool,
    pub total_mm: Decimal,
}

impl RainOutlook {
    /// The outlook reported when no forecast could be obtained
    pub fn unavailable() -> Self {
        Self {
            expected: false,
            total_mm: Decimal::ZERO,
        }
    }
}
