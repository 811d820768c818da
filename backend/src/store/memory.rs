//! In-memory implementations of every store, for tests and local runs

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    default_catalog, CachedForecast, CropParameters, DateRange, FieldConfig, GddRecord,
    GpsCoordinates, GrowthStage, NewSensorReading, SensorReading, WeatherForecast,
};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{cache_window, CatalogFilter, CropCatalog, FieldStore, ForecastCache, GddStore, ReadingStore};
use crate::error::{AppError, AppResult};

/// Every store backed by maps behind async read/write locks
pub struct MemoryStore {
    fields: RwLock<HashMap<String, FieldConfig>>,
    readings: RwLock<Vec<SensorReading>>,
    catalog: RwLock<Vec<CropParameters>>,
    forecasts: RwLock<HashMap<(Decimal, Decimal), CachedForecast>>,
    gdd: RwLock<BTreeMap<(String, NaiveDate), GddRecord>>,
}

impl MemoryStore {
    /// Empty store seeded with the built-in crop catalog
    pub fn new() -> Self {
        Self::from_catalog(default_catalog())
    }

    /// Empty store seeded with a custom catalog; every entry must pass
    /// `CropParameters::validate`
    pub fn with_catalog(catalog: Vec<CropParameters>) -> AppResult<Self> {
        for crop in &catalog {
            crop.validate()?;
        }
        Ok(Self::from_catalog(catalog))
    }

    fn from_catalog(catalog: Vec<CropParameters>) -> Self {
        Self {
            fields: RwLock::new(HashMap::new()),
            readings: RwLock::new(Vec::new()),
            catalog: RwLock::new(catalog),
            forecasts: RwLock::new(HashMap::new()),
            gdd: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register or replace a field
    pub async fn insert_field(&self, field: FieldConfig) {
        self.fields.write().await.insert(field.node_id.clone(), field);
    }

    /// Seed a forecast cache entry with explicit timestamps
    pub async fn insert_cached_forecast(&self, entry: CachedForecast) {
        self.forecasts
            .write()
            .await
            .insert(entry.forecast.location.cache_key(), entry);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FieldStore for MemoryStore {
    async fn get_field(&self, node_id: &str) -> AppResult<FieldConfig> {
        self.fields
            .read()
            .await
            .get(node_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Field {}", node_id)))
    }

    async fn start_crop_cycle(
        &self,
        node_id: &str,
        crop_type: &str,
        sowing_date: NaiveDate,
    ) -> AppResult<FieldConfig> {
        let mut fields = self.fields.write().await;
        let field = fields
            .get_mut(node_id)
            .ok_or_else(|| AppError::NotFound(format!("Field {}", node_id)))?;

        field.crop_type = Some(crop_type.to_string());
        field.crop_confirmed = true;
        field.sowing_date = Some(sowing_date);
        field.accumulated_gdd = Decimal::ZERO;
        field.current_growth_stage = GrowthStage::Initial;

        Ok(field.clone())
    }

    async fn update_growth(
        &self,
        node_id: &str,
        accumulated_gdd: Decimal,
        stage: GrowthStage,
    ) -> AppResult<()> {
        let mut fields = self.fields.write().await;
        let field = fields
            .get_mut(node_id)
            .ok_or_else(|| AppError::NotFound(format!("Field {}", node_id)))?;
        field.accumulated_gdd = accumulated_gdd;
        field.current_growth_stage = stage;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReadingStore for MemoryStore {
    async fn get_latest_reading(&self, node_id: &str) -> AppResult<Option<SensorReading>> {
        Ok(self
            .readings
            .read()
            .await
            .iter()
            .filter(|r| r.node_id == node_id)
            .max_by_key(|r| r.recorded_at)
            .cloned())
    }

    async fn create_reading(&self, reading: NewSensorReading) -> AppResult<SensorReading> {
        let stored = SensorReading {
            id: Uuid::new_v4(),
            node_id: reading.node_id,
            raw_moisture: reading.raw_moisture,
            raw_temperature: reading.raw_temperature,
            vwc_percent: Some(reading.vwc_percent),
            soil_temperature_celsius: Some(reading.soil_temperature_celsius),
            recorded_at: reading.recorded_at,
        };
        self.readings.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn readings_between(
        &self,
        node_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<SensorReading>> {
        let mut readings: Vec<SensorReading> = self
            .readings
            .read()
            .await
            .iter()
            .filter(|r| r.node_id == node_id && r.recorded_at >= from && r.recorded_at < to)
            .cloned()
            .collect();
        readings.sort_by_key(|r| r.recorded_at);
        Ok(readings)
    }
}

#[async_trait::async_trait]
impl CropCatalog for MemoryStore {
    async fn get_crop_parameters(&self, name: &str) -> AppResult<Option<CropParameters>> {
        Ok(self
            .catalog
            .read()
            .await
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
            .cloned())
    }

    async fn list_catalog(&self, filter: CatalogFilter) -> AppResult<Vec<CropParameters>> {
        Ok(self
            .catalog
            .read()
            .await
            .iter()
            .filter(|c| !filter.region_only || c.up_region_valid)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl ForecastCache for MemoryStore {
    async fn get_cached_forecast(&self, location: GpsCoordinates) -> AppResult<Option<CachedForecast>> {
        Ok(self.forecasts.read().await.get(&location.cache_key()).cloned())
    }

    async fn cache_forecast(
        &self,
        location: GpsCoordinates,
        forecast: &WeatherForecast,
        ttl: Duration,
    ) -> AppResult<CachedForecast> {
        let (fetched_at, expires_at) = cache_window(ttl);
        let entry = CachedForecast {
            forecast: forecast.clone(),
            fetched_at,
            expires_at,
        };
        self.forecasts
            .write()
            .await
            .insert(location.cache_key(), entry.clone());
        Ok(entry)
    }
}

#[async_trait::async_trait]
impl GddStore for MemoryStore {
    async fn upsert_gdd_record(&self, record: &GddRecord) -> AppResult<GddRecord> {
        self.gdd
            .write()
            .await
            .insert((record.node_id.clone(), record.record_date), record.clone());
        Ok(record.clone())
    }

    async fn get_gdd_history(&self, node_id: &str, range: &DateRange) -> AppResult<Vec<GddRecord>> {
        if range.start > range.end {
            return Ok(Vec::new());
        }
        let start = (node_id.to_string(), range.start);
        let end = (node_id.to_string(), range.end);
        Ok(self
            .gdd
            .read()
            .await
            .range(start..=end)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(node: &str, day: u32, cumulative: i64) -> GddRecord {
        GddRecord {
            node_id: node.to_string(),
            record_date: NaiveDate::from_ymd_opt(2024, 11, day).unwrap(),
            avg_temperature: Decimal::from(15),
            min_temperature: Decimal::from(10),
            max_temperature: Decimal::from(20),
            reading_count: 24,
            daily_gdd: Decimal::TEN,
            cumulative_gdd: Decimal::from(cumulative),
            crop_type: "Wheat".to_string(),
            base_temperature: Decimal::from(5),
            growth_stage: GrowthStage::Initial,
        }
    }

    #[tokio::test]
    async fn test_gdd_upsert_replaces_same_date() {
        let store = MemoryStore::new();
        store.upsert_gdd_record(&record("n1", 1, 10)).await.unwrap();
        store.upsert_gdd_record(&record("n1", 1, 12)).await.unwrap();
        store.upsert_gdd_record(&record("n2", 1, 99)).await.unwrap();

        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(),
        };
        let history = store.get_gdd_history("n1", &range).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].cumulative_gdd, Decimal::from(12));
    }

    #[tokio::test]
    async fn test_catalog_region_filter() {
        let store = MemoryStore::new();
        let all = store.list_catalog(CatalogFilter { region_only: false }).await.unwrap();
        let regional = store.list_catalog(CatalogFilter { region_only: true }).await.unwrap();
        assert!(regional.len() < all.len());
        assert!(regional.iter().all(|c| c.up_region_valid));
        assert_eq!(all[0].name, "Wheat");
    }

    #[test]
    fn test_custom_catalog_rejects_single_value_band() {
        let mut crop = shared::find_default_crop("Wheat").unwrap();
        crop.vwc_min = crop.vwc_optimal;
        crop.vwc_max = crop.vwc_optimal;
        assert!(MemoryStore::with_catalog(vec![crop]).is_err());
    }

    #[test]
    fn test_custom_catalog_rejects_unordered_stages() {
        let mut crop = shared::find_default_crop("Wheat").unwrap();
        crop.stage_thresholds = shared::StageThresholds::new(40, 15, 75, 100);
        assert!(MemoryStore::with_catalog(vec![crop]).is_err());
        assert!(MemoryStore::with_catalog(default_catalog()).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_field_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_field("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
