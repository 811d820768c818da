//! Fixtures shared by the engine integration tests

#![allow(dead_code)]

use agrosense_backend::{
    external::ForecastProvider, store::MemoryStore, AppError, AppResult, EngineContext,
    EngineSettings,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    default_catalog, CropParameters, DailyForecast, FieldConfig, GpsCoordinates, GrowthStage,
    NewSensorReading, Season, SoilTexture, StageThresholds, WeatherForecast,
};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_CROP: &str = "Testbean";

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

/// Crop with a 25/30/35 VWC band, 40 cm roots and MAD 0.5
pub fn test_crop() -> CropParameters {
    CropParameters {
        name: TEST_CROP.to_string(),
        base_temperature: dec("10"),
        total_gdd: dec("1000"),
        vwc_min: dec("25"),
        vwc_optimal: dec("30"),
        vwc_max: dec("35"),
        root_depth_cm: dec("40"),
        mad: dec("0.5"),
        stage_thresholds: StageThresholds::new(15, 40, 75, 95),
        preferred_textures: vec![SoilTexture::SandyLoam],
        season: Season::Perennial,
        up_region_valid: false,
    }
}

pub fn test_location() -> GpsCoordinates {
    GpsCoordinates::new(dec("26.85"), dec("80.95"))
}

/// Field on sandy loam with the test crop confirmed
pub fn confirmed_field(node_id: &str) -> FieldConfig {
    FieldConfig {
        node_id: node_id.to_string(),
        crop_type: Some(TEST_CROP.to_string()),
        soil_texture: SoilTexture::SandyLoam,
        sowing_date: Some(date("2024-06-01")),
        crop_confirmed: true,
        current_growth_stage: GrowthStage::Initial,
        accumulated_gdd: Decimal::ZERO,
        coordinates: test_location(),
    }
}

pub fn unconfirmed_field(node_id: &str, texture: SoilTexture) -> FieldConfig {
    FieldConfig {
        node_id: node_id.to_string(),
        crop_type: None,
        soil_texture: texture,
        sowing_date: None,
        crop_confirmed: false,
        current_growth_stage: GrowthStage::Initial,
        accumulated_gdd: Decimal::ZERO,
        coordinates: test_location(),
    }
}

/// Store with the built-in catalog plus the test crop
pub fn store() -> Arc<MemoryStore> {
    let mut catalog = default_catalog();
    catalog.push(test_crop());
    Arc::new(MemoryStore::with_catalog(catalog).unwrap())
}

pub fn context(
    store: Arc<MemoryStore>,
    provider: Option<Arc<dyn ForecastProvider>>,
) -> Arc<EngineContext> {
    Arc::new(EngineContext::in_memory(store, provider, EngineSettings::default()))
}

/// Store a reading with an already-calibrated VWC and temperature
pub async fn add_reading(
    store: &MemoryStore,
    node_id: &str,
    vwc: &str,
    temperature: &str,
    recorded_at: DateTime<Utc>,
) {
    use agrosense_backend::store::ReadingStore;

    store
        .create_reading(NewSensorReading {
            node_id: node_id.to_string(),
            raw_moisture: 0,
            raw_temperature: 0,
            vwc_percent: dec(vwc),
            soil_temperature_celsius: dec(temperature),
            recorded_at,
        })
        .await
        .unwrap();
}

/// Register a confirmed field whose latest reading is `vwc`
pub async fn field_at_vwc(store: &MemoryStore, node_id: &str, vwc: &str) {
    store.insert_field(confirmed_field(node_id)).await;
    add_reading(store, node_id, vwc, "24", Utc::now() - Duration::minutes(10)).await;
}

/// Forecast with `rain_mm` falling today at the test location
pub fn forecast_with_rain(rain_mm: &str) -> WeatherForecast {
    let today = Utc::now().date_naive();
    WeatherForecast {
        location: test_location(),
        days: vec![DailyForecast {
            date: today,
            temp_max_celsius: dec("34"),
            temp_min_celsius: dec("24"),
            temp_avg_celsius: dec("29"),
            humidity_percent: dec("80"),
            precipitation_mm: dec(rain_mm),
            description: "moderate rain".to_string(),
        }],
    }
}

pub enum Script {
    Forecast(WeatherForecast),
    Fail,
    Hang,
}

/// Forecast provider with a fixed behavior that counts its calls
pub struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ForecastProvider for ScriptedProvider {
    async fn fetch_forecast(&self, _location: GpsCoordinates) -> AppResult<WeatherForecast> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Forecast(forecast) => Ok(forecast.clone()),
            Script::Fail => Err(AppError::ExternalService("upstream returned 503".to_string())),
            Script::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                Err(AppError::ExternalService("unreachable".to_string()))
            }
        }
    }
}

pub fn context_with_settings(
    store: Arc<MemoryStore>,
    provider: Option<Arc<dyn ForecastProvider>>,
    settings: EngineSettings,
) -> Arc<EngineContext> {
    Arc::new(EngineContext::in_memory(store, provider, settings))
}
