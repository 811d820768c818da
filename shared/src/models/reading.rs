//! Sensor reading models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calibrated soil reading. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorReading {
    pub id: Uuid,
    pub node_id: String,
    pub raw_moisture: i32,
    pub raw_temperature: i32,
    pub vwc_percent: Option<Decimal>,
    pub soil_temperature_celsius: Option<Decimal>,
    pub recorded_at: DateTime<Utc>,
}

/// Fields needed to store a new reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSensorReading {
    pub node_id: String,
    pub raw_moisture: i32,
    pub raw_temperature: i32,
    pub vwc_percent: Decimal,
    pub soil_temperature_celsius: Decimal,
    pub recorded_at: DateTime<Utc>,
}
