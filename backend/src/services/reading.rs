//! Reading ingest: calibrates raw sensor counts and stores the result

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{calibrate, NewSensorReading, SensorReading};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::EngineContext;

/// Raw reading as reported by a sensor node
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngestReadingInput {
    #[validate(length(min = 1, max = 64))]
    pub node_id: String,

    /// Moisture ADC count
    #[validate(range(min = 0))]
    pub raw_moisture: i32,

    /// Soil temperature in tenths of a degree Celsius
    pub raw_temperature: i32,

    /// Defaults to the time of ingest
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ReadingService {
    ctx: Arc<EngineContext>,
}

impl ReadingService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Calibrate and store a raw reading for a known field
    pub async fn ingest_reading(&self, input: IngestReadingInput) -> AppResult<SensorReading> {
        input.validate()?;
        shared::validate_node_id(&input.node_id)
            .map_err(|msg| AppError::validation("node_id", msg))?;

        let field = self.ctx.fields.get_field(&input.node_id).await?;
        let calibrated = calibrate(
            input.raw_moisture,
            input.raw_temperature,
            field.soil_texture,
            self.ctx.settings.sensor_range,
        )?;

        let reading = self
            .ctx
            .readings
            .create_reading(NewSensorReading {
                node_id: input.node_id,
                raw_moisture: input.raw_moisture,
                raw_temperature: input.raw_temperature,
                vwc_percent: calibrated.vwc_percent,
                soil_temperature_celsius: calibrated.soil_temperature_celsius,
                recorded_at: input.recorded_at.unwrap_or_else(Utc::now),
            })
            .await?;

        tracing::info!(
            node_id = %reading.node_id,
            vwc = %calibrated.vwc_percent,
            soil_temp = %calibrated.soil_temperature_celsius,
            "Reading ingested"
        );

        Ok(reading)
    }

    /// The most recent stored reading for a node
    pub async fn latest_reading(&self, node_id: &str) -> AppResult<SensorReading> {
        self.ctx
            .readings
            .get_latest_reading(node_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sensor reading for {}", node_id)))
    }
}
