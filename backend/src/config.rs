//! Configuration management for the AgroSense decision engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGS_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{IrrigationLimits, SensorRange};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Weather provider and rain-check configuration
    pub weather: WeatherConfig,

    /// Irrigation recommendation limits
    pub irrigation: IrrigationConfig,

    /// Moisture sensor range
    pub sensor: SensorConfig,

    /// Crop recommendation configuration
    pub crops: CropsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key; an empty key disables the provider
    pub api_key: String,

    /// How long a fetched forecast stays in the cache
    pub cache_ttl_minutes: i64,

    /// Upper bound on one provider call
    pub request_timeout_secs: u64,

    /// Rain-check window used by irrigation decisions
    pub rain_lookahead_hours: i64,

    /// Rain total that counts as "rain expected"
    pub rain_threshold_mm: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IrrigationConfig {
    pub min_depth_mm: Decimal,
    pub max_depth_mm: Decimal,
    pub application_rate_mm_per_hour: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    pub raw_moisture_min: i32,
    pub raw_moisture_max: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CropsConfig {
    /// Only recommend crops valid for the operating region
    pub region_only: bool,

    /// Recommendations returned when the caller does not ask for a count
    pub default_top_n: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("AGS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "postgres://localhost/agrosense")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.cache_ttl_minutes", 180)?
            .set_default("weather.request_timeout_secs", 10)?
            .set_default("weather.rain_lookahead_hours", 48)?
            .set_default("weather.rain_threshold_mm", "5")?
            .set_default("irrigation.min_depth_mm", "5")?
            .set_default("irrigation.max_depth_mm", "50")?
            .set_default("irrigation.application_rate_mm_per_hour", "5")?
            .set_default("sensor.raw_moisture_min", 0)?
            .set_default("sensor.raw_moisture_max", 1023)?
            .set_default("crops.region_only", true)?
            .set_default("crops.default_top_n", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGS_ prefix)
            .add_source(
                Environment::with_prefix("AGS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Engine tunables derived from this configuration
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            sensor_range: SensorRange {
                raw_min: self.sensor.raw_moisture_min,
                raw_max: self.sensor.raw_moisture_max,
            },
            irrigation: IrrigationLimits {
                min_depth_mm: self.irrigation.min_depth_mm,
                max_depth_mm: self.irrigation.max_depth_mm,
                application_rate_mm_per_hour: self.irrigation.application_rate_mm_per_hour,
            },
            forecast_ttl_minutes: self.weather.cache_ttl_minutes,
            provider_timeout_secs: self.weather.request_timeout_secs,
            rain_lookahead_hours: self.weather.rain_lookahead_hours,
            rain_threshold_mm: self.weather.rain_threshold_mm,
            region_only_catalog: self.crops.region_only,
            default_top_n: self.crops.default_top_n,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Tunables the engine services read at call time
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub sensor_range: SensorRange,
    pub irrigation: IrrigationLimits,
    pub forecast_ttl_minutes: i64,
    pub provider_timeout_secs: u64,
    pub rain_lookahead_hours: i64,
    pub rain_threshold_mm: Decimal,
    pub region_only_catalog: bool,
    pub default_top_n: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sensor_range: SensorRange::default(),
            irrigation: IrrigationLimits::default(),
            forecast_ttl_minutes: 180,
            provider_timeout_secs: 10,
            rain_lookahead_hours: 48,
            rain_threshold_mm: Decimal::from(5),
            region_only_catalog: true,
            default_top_n: 5,
        }
    }
}

impl EngineSettings {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.sensor_range.raw_min >= self.sensor_range.raw_max {
            return Err("sensor.raw_moisture_min must be below sensor.raw_moisture_max".to_string());
        }
        self.irrigation.validate().map_err(|e| e.to_string())?;
        if self.forecast_ttl_minutes <= 0 {
            return Err("weather.cache_ttl_minutes must be positive".to_string());
        }
        shared::validate_lookahead_hours(self.rain_lookahead_hours)?;
        Ok(())
    }
}
