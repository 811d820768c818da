//! Persistence collaborators used by the engine services
//!
//! Each store is a trait so services can run against PostgreSQL in
//! production and in-memory maps in tests.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    CachedForecast, CropParameters, DateRange, FieldConfig, GddRecord, GpsCoordinates,
    GrowthStage, NewSensorReading, SensorReading, WeatherForecast,
};

use crate::error::AppResult;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which catalog entries to list
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFilter {
    /// Only crops valid for the operating region
    pub region_only: bool,
}

// ============================================================================
// Store Traits
// ============================================================================

#[async_trait::async_trait]
pub trait FieldStore: Send + Sync {
    /// Field configuration; `NotFound` when no field uses this node
    async fn get_field(&self, node_id: &str) -> AppResult<FieldConfig>;

    /// Start a new crop cycle, replacing any previous one
    async fn start_crop_cycle(
        &self,
        node_id: &str,
        crop_type: &str,
        sowing_date: NaiveDate,
    ) -> AppResult<FieldConfig>;

    /// Store the latest thermal-time state of the field
    async fn update_growth(
        &self,
        node_id: &str,
        accumulated_gdd: Decimal,
        stage: GrowthStage,
    ) -> AppResult<()>;
}

#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    async fn get_latest_reading(&self, node_id: &str) -> AppResult<Option<SensorReading>>;

    async fn create_reading(&self, reading: NewSensorReading) -> AppResult<SensorReading>;

    /// Readings with `from <= recorded_at < to`, oldest first
    async fn readings_between(
        &self,
        node_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<SensorReading>>;
}

#[async_trait::async_trait]
pub trait CropCatalog: Send + Sync {
    /// Case-insensitive lookup by crop name
    async fn get_crop_parameters(&self, name: &str) -> AppResult<Option<CropParameters>>;

    /// Catalog entries in insertion order
    async fn list_catalog(&self, filter: CatalogFilter) -> AppResult<Vec<CropParameters>>;
}

/// Forecasts keyed by coordinates rounded to 2 decimals.
///
/// Writes replace the whole entry, so concurrent writers for the same key
/// resolve last-writer-wins.
#[async_trait::async_trait]
pub trait ForecastCache: Send + Sync {
    /// The cached entry for a location, fresh or not
    async fn get_cached_forecast(&self, location: GpsCoordinates) -> AppResult<Option<CachedForecast>>;

    async fn cache_forecast(
        &self,
        location: GpsCoordinates,
        forecast: &WeatherForecast,
        ttl: Duration,
    ) -> AppResult<CachedForecast>;
}

#[async_trait::async_trait]
pub trait GddStore: Send + Sync {
    /// Insert or replace the record for `(node_id, record_date)`
    async fn upsert_gdd_record(&self, record: &GddRecord) -> AppResult<GddRecord>;

    /// Records within the inclusive range, ordered by date
    async fn get_gdd_history(&self, node_id: &str, range: &DateRange) -> AppResult<Vec<GddRecord>>;
}

/// Cache entry timestamps for a forecast fetched now
pub(crate) fn cache_window(ttl: Duration) -> (DateTime<Utc>, DateTime<Utc>) {
    let fetched_at = Utc::now();
    (fetched_at, fetched_at + ttl)
}
