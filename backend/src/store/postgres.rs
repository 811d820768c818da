//! PostgreSQL implementations of the stores

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    CachedForecast, CropParameters, DailyForecast, DateRange, FieldConfig, GddRecord,
    GpsCoordinates, GrowthStage, NewSensorReading, SensorReading, SoilTexture, StageThresholds,
    WeatherForecast,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{cache_window, CatalogFilter, CropCatalog, FieldStore, ForecastCache, GddStore, ReadingStore};
use crate::error::{AppError, AppResult};

/// Every store backed by one connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(Debug, FromRow)]
struct FieldRow {
    node_id: String,
    crop_type: Option<String>,
    soil_texture: String,
    sowing_date: Option<NaiveDate>,
    crop_confirmed: bool,
    current_growth_stage: String,
    accumulated_gdd: Decimal,
    latitude: Decimal,
    longitude: Decimal,
}

impl TryFrom<FieldRow> for FieldConfig {
    type Error = AppError;

    fn try_from(row: FieldRow) -> Result<Self, Self::Error> {
        Ok(FieldConfig {
            soil_texture: row.soil_texture.parse()?,
            current_growth_stage: row.current_growth_stage.parse()?,
            node_id: row.node_id,
            crop_type: row.crop_type,
            sowing_date: row.sowing_date,
            crop_confirmed: row.crop_confirmed,
            accumulated_gdd: row.accumulated_gdd,
            coordinates: GpsCoordinates::new(row.latitude, row.longitude),
        })
    }
}

#[derive(Debug, FromRow)]
struct ReadingRow {
    id: Uuid,
    node_id: String,
    raw_moisture: i32,
    raw_temperature: i32,
    vwc_percent: Option<Decimal>,
    soil_temperature_celsius: Option<Decimal>,
    recorded_at: DateTime<Utc>,
}

impl From<ReadingRow> for SensorReading {
    fn from(row: ReadingRow) -> Self {
        SensorReading {
            id: row.id,
            node_id: row.node_id,
            raw_moisture: row.raw_moisture,
            raw_temperature: row.raw_temperature,
            vwc_percent: row.vwc_percent,
            soil_temperature_celsius: row.soil_temperature_celsius,
            recorded_at: row.recorded_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CropRow {
    name: String,
    base_temperature: Decimal,
    total_gdd: Decimal,
    vwc_min: Decimal,
    vwc_optimal: Decimal,
    vwc_max: Decimal,
    root_depth_cm: Decimal,
    mad: Decimal,
    initial_end: Decimal,
    development_end: Decimal,
    mid_season_end: Decimal,
    late_season_end: Decimal,
    preferred_textures: Vec<String>,
    season: String,
    up_region_valid: bool,
}

impl TryFrom<CropRow> for CropParameters {
    type Error = AppError;

    fn try_from(row: CropRow) -> Result<Self, Self::Error> {
        let preferred_textures = row
            .preferred_textures
            .iter()
            .map(|t| t.parse::<SoilTexture>())
            .collect::<Result<Vec<_>, _>>()?;

        let crop = CropParameters {
            season: row.season.parse()?,
            name: row.name,
            base_temperature: row.base_temperature,
            total_gdd: row.total_gdd,
            vwc_min: row.vwc_min,
            vwc_optimal: row.vwc_optimal,
            vwc_max: row.vwc_max,
            root_depth_cm: row.root_depth_cm,
            mad: row.mad,
            stage_thresholds: StageThresholds {
                initial_end: row.initial_end,
                development_end: row.development_end,
                mid_season_end: row.mid_season_end,
                late_season_end: row.late_season_end,
            },
            preferred_textures,
            up_region_valid: row.up_region_valid,
        };
        crop.validate()?;
        Ok(crop)
    }
}

#[derive(Debug, FromRow)]
struct GddRow {
    node_id: String,
    record_date: NaiveDate,
    avg_temperature: Decimal,
    min_temperature: Decimal,
    max_temperature: Decimal,
    reading_count: i32,
    daily_gdd: Decimal,
    cumulative_gdd: Decimal,
    crop_type: String,
    base_temperature: Decimal,
    growth_stage: String,
}

impl TryFrom<GddRow> for GddRecord {
    type Error = AppError;

    fn try_from(row: GddRow) -> Result<Self, Self::Error> {
        Ok(GddRecord {
            growth_stage: row.growth_stage.parse()?,
            node_id: row.node_id,
            record_date: row.record_date,
            avg_temperature: row.avg_temperature,
            min_temperature: row.min_temperature,
            max_temperature: row.max_temperature,
            reading_count: row.reading_count,
            daily_gdd: row.daily_gdd,
            cumulative_gdd: row.cumulative_gdd,
            crop_type: row.crop_type,
            base_temperature: row.base_temperature,
        })
    }
}

#[derive(Debug, FromRow)]
struct ForecastRow {
    latitude: Decimal,
    longitude: Decimal,
    days: serde_json::Value,
    fetched_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<ForecastRow> for CachedForecast {
    type Error = AppError;

    fn try_from(row: ForecastRow) -> Result<Self, Self::Error> {
        let days: Vec<DailyForecast> = serde_json::from_value(row.days)
            .map_err(|e| AppError::Internal(format!("Corrupt forecast cache entry: {}", e)))?;
        Ok(CachedForecast {
            forecast: WeatherForecast {
                location: GpsCoordinates::new(row.latitude, row.longitude),
                days,
            },
            fetched_at: row.fetched_at,
            expires_at: row.expires_at,
        })
    }
}

const FIELD_COLUMNS: &str = "node_id, crop_type, soil_texture, sowing_date, crop_confirmed, \
     current_growth_stage, accumulated_gdd, latitude, longitude";

const READING_COLUMNS: &str = "id, node_id, raw_moisture, raw_temperature, vwc_percent, \
     soil_temperature_celsius, recorded_at";

const CROP_COLUMNS: &str = "name, base_temperature, total_gdd, vwc_min, vwc_optimal, vwc_max, \
     root_depth_cm, mad, initial_end, development_end, mid_season_end, late_season_end, \
     preferred_textures, season, up_region_valid";

const GDD_COLUMNS: &str = "node_id, record_date, avg_temperature, min_temperature, \
     max_temperature, reading_count, daily_gdd, cumulative_gdd, crop_type, base_temperature, \
     growth_stage";

// ============================================================================
// Fields
// ============================================================================

#[async_trait::async_trait]
impl FieldStore for PgStore {
    async fn get_field(&self, node_id: &str) -> AppResult<FieldConfig> {
        let row = sqlx::query_as::<_, FieldRow>(&format!(
            "SELECT {} FROM fields WHERE node_id = $1",
            FIELD_COLUMNS
        ))
        .bind(node_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Field {}", node_id)))?;

        row.try_into()
    }

    async fn start_crop_cycle(
        &self,
        node_id: &str,
        crop_type: &str,
        sowing_date: NaiveDate,
    ) -> AppResult<FieldConfig> {
        let row = sqlx::query_as::<_, FieldRow>(&format!(
            r#"
            UPDATE fields
            SET crop_type = $2,
                crop_confirmed = TRUE,
                sowing_date = $3,
                accumulated_gdd = 0,
                current_growth_stage = $4,
                updated_at = NOW()
            WHERE node_id = $1
            RETURNING {}
            "#,
            FIELD_COLUMNS
        ))
        .bind(node_id)
        .bind(crop_type)
        .bind(sowing_date)
        .bind(GrowthStage::Initial.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Field {}", node_id)))?;

        row.try_into()
    }

    async fn update_growth(
        &self,
        node_id: &str,
        accumulated_gdd: Decimal,
        stage: GrowthStage,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE fields
            SET accumulated_gdd = $2, current_growth_stage = $3, updated_at = NOW()
            WHERE node_id = $1
            "#,
        )
        .bind(node_id)
        .bind(accumulated_gdd)
        .bind(stage.as_str())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Field {}", node_id)));
        }
        Ok(())
    }
}

// ============================================================================
// Sensor Readings
// ============================================================================

#[async_trait::async_trait]
impl ReadingStore for PgStore {
    async fn get_latest_reading(&self, node_id: &str) -> AppResult<Option<SensorReading>> {
        let row = sqlx::query_as::<_, ReadingRow>(&format!(
            "SELECT {} FROM sensor_readings WHERE node_id = $1 ORDER BY recorded_at DESC LIMIT 1",
            READING_COLUMNS
        ))
        .bind(node_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(SensorReading::from))
    }

    async fn create_reading(&self, reading: NewSensorReading) -> AppResult<SensorReading> {
        let row = sqlx::query_as::<_, ReadingRow>(&format!(
            r#"
            INSERT INTO sensor_readings (
                node_id, raw_moisture, raw_temperature, vwc_percent,
                soil_temperature_celsius, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            READING_COLUMNS
        ))
        .bind(&reading.node_id)
        .bind(reading.raw_moisture)
        .bind(reading.raw_temperature)
        .bind(reading.vwc_percent)
        .bind(reading.soil_temperature_celsius)
        .bind(reading.recorded_at)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn readings_between(
        &self,
        node_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<SensorReading>> {
        let rows = sqlx::query_as::<_, ReadingRow>(&format!(
            r#"
            SELECT {} FROM sensor_readings
            WHERE node_id = $1 AND recorded_at >= $2 AND recorded_at < $3
            ORDER BY recorded_at ASC
            "#,
            READING_COLUMNS
        ))
        .bind(node_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SensorReading::from).collect())
    }
}

// ============================================================================
// Crop Catalog
// ============================================================================

#[async_trait::async_trait]
impl CropCatalog for PgStore {
    async fn get_crop_parameters(&self, name: &str) -> AppResult<Option<CropParameters>> {
        let row = sqlx::query_as::<_, CropRow>(&format!(
            "SELECT {} FROM crop_catalog WHERE LOWER(name) = LOWER($1)",
            CROP_COLUMNS
        ))
        .bind(name.trim())
        .fetch_optional(&self.db)
        .await?;

        row.map(CropParameters::try_from).transpose()
    }

    async fn list_catalog(&self, filter: CatalogFilter) -> AppResult<Vec<CropParameters>> {
        let rows = sqlx::query_as::<_, CropRow>(&format!(
            r#"
            SELECT {} FROM crop_catalog
            WHERE ($1 = FALSE OR up_region_valid = TRUE)
            ORDER BY catalog_order ASC
            "#,
            CROP_COLUMNS
        ))
        .bind(filter.region_only)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(CropParameters::try_from).collect()
    }
}

// ============================================================================
// Forecast Cache
// ============================================================================

#[async_trait::async_trait]
impl ForecastCache for PgStore {
    async fn get_cached_forecast(&self, location: GpsCoordinates) -> AppResult<Option<CachedForecast>> {
        let (latitude, longitude) = location.cache_key();
        let row = sqlx::query_as::<_, ForecastRow>(
            r#"
            SELECT latitude, longitude, days, fetched_at, expires_at
            FROM weather_forecast_cache
            WHERE latitude = $1 AND longitude = $2
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.db)
        .await?;

        row.map(CachedForecast::try_from).transpose()
    }

    async fn cache_forecast(
        &self,
        location: GpsCoordinates,
        forecast: &WeatherForecast,
        ttl: Duration,
    ) -> AppResult<CachedForecast> {
        let (latitude, longitude) = location.cache_key();
        let days = serde_json::to_value(&forecast.days).map_err(|e| AppError::Internal(e.to_string()))?;
        let (fetched_at, expires_at) = cache_window(ttl);

        let row = sqlx::query_as::<_, ForecastRow>(
            r#"
            INSERT INTO weather_forecast_cache (latitude, longitude, days, fetched_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (latitude, longitude) DO UPDATE
            SET days = EXCLUDED.days,
                fetched_at = EXCLUDED.fetched_at,
                expires_at = EXCLUDED.expires_at
            RETURNING latitude, longitude, days, fetched_at, expires_at
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(&days)
        .bind(fetched_at)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }
}

// ============================================================================
// GDD Records
// ============================================================================

#[async_trait::async_trait]
impl GddStore for PgStore {
    async fn upsert_gdd_record(&self, record: &GddRecord) -> AppResult<GddRecord> {
        let row = sqlx::query_as::<_, GddRow>(&format!(
            r#"
            INSERT INTO gdd_records (
                node_id, record_date, avg_temperature, min_temperature, max_temperature,
                reading_count, daily_gdd, cumulative_gdd, crop_type, base_temperature, growth_stage
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (node_id, record_date) DO UPDATE
            SET avg_temperature = EXCLUDED.avg_temperature,
                min_temperature = EXCLUDED.min_temperature,
                max_temperature = EXCLUDED.max_temperature,
                reading_count = EXCLUDED.reading_count,
                daily_gdd = EXCLUDED.daily_gdd,
                cumulative_gdd = EXCLUDED.cumulative_gdd,
                crop_type = EXCLUDED.crop_type,
                base_temperature = EXCLUDED.base_temperature,
                growth_stage = EXCLUDED.growth_stage,
                updated_at = NOW()
            RETURNING {}
            "#,
            GDD_COLUMNS
        ))
        .bind(&record.node_id)
        .bind(record.record_date)
        .bind(record.avg_temperature)
        .bind(record.min_temperature)
        .bind(record.max_temperature)
        .bind(record.reading_count)
        .bind(record.daily_gdd)
        .bind(record.cumulative_gdd)
        .bind(&record.crop_type)
        .bind(record.base_temperature)
        .bind(record.growth_stage.as_str())
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn get_gdd_history(&self, node_id: &str, range: &DateRange) -> AppResult<Vec<GddRecord>> {
        let rows = sqlx::query_as::<_, GddRow>(&format!(
            r#"
            SELECT {} FROM gdd_records
            WHERE node_id = $1 AND record_date BETWEEN $2 AND $3
            ORDER BY record_date ASC
            "#,
            GDD_COLUMNS
        ))
        .bind(node_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(GddRecord::try_from).collect()
    }
}
