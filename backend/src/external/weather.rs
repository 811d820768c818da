//! Weather API client for fetching forecasts
//!
//! Integrates with the OpenWeatherMap 5-day / 3-hour forecast endpoint.

use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{aggregate_daily, round_half_up, ForecastEntry, GpsCoordinates, WeatherForecast};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Source of multi-day forecasts
#[async_trait::async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch a daily forecast for a location from the upstream service
    async fn fetch_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast>;
}

/// OpenWeatherMap client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    #[serde(default)]
    weather: Vec<OWMWeather>,
    rain: Option<OWMForecastRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMForecastRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

fn to_decimal(value: f64) -> Decimal {
    round_half_up(Decimal::from_f64_retain(value).unwrap_or_default(), 2)
}

impl OpenWeatherClient {
    /// Create a new client with a per-request timeout
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Weather HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the raw 3-hourly entries for a location
    pub async fn get_forecast_entries(&self, location: GpsCoordinates) -> AppResult<Vec<ForecastEntry>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url, location.latitude, location.longitude, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMForecastResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse forecast response: {}", e))
        })?;

        Ok(convert_forecast_items(data.list))
    }
}

/// Convert OpenWeatherMap forecast items to our format, skipping entries
/// with an unrepresentable timestamp
fn convert_forecast_items(items: Vec<OWMForecastItem>) -> Vec<ForecastEntry> {
    items
        .into_iter()
        .filter_map(|item| {
            let timestamp: DateTime<Utc> = DateTime::from_timestamp(item.dt, 0)?;
            Some(ForecastEntry {
                timestamp,
                temperature_celsius: to_decimal(item.main.temp),
                temp_min_celsius: to_decimal(item.main.temp_min),
                temp_max_celsius: to_decimal(item.main.temp_max),
                humidity_percent: Decimal::from(item.main.humidity),
                precipitation_mm: item
                    .rain
                    .and_then(|r| r.three_hour)
                    .map(to_decimal)
                    .unwrap_or_default(),
                description: item
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait::async_trait]
impl ForecastProvider for OpenWeatherClient {
    async fn fetch_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast> {
        let entries = self.get_forecast_entries(location).await?;
        if entries.is_empty() {
            return Err(AppError::ExternalService(
                "Weather API returned no forecast entries".to_string(),
            ));
        }
        Ok(WeatherForecast {
            location,
            days: aggregate_daily(&entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cod": "200",
        "list": [
            {
                "dt": 1719792000,
                "main": {"temp": 31.2, "temp_min": 30.1, "temp_max": 33.4, "humidity": 64},
                "weather": [{"main": "Rain", "description": "light rain"}],
                "rain": {"3h": 2.5}
            },
            {
                "dt": 1719802800,
                "main": {"temp": 29.0, "temp_min": 28.0, "temp_max": 29.5, "humidity": 80},
                "weather": [{"main": "Clouds", "description": "overcast clouds"}]
            }
        ]
    }"#;

    #[test]
    fn test_parse_forecast_response() {
        let data: OWMForecastResponse = serde_json::from_str(SAMPLE).unwrap();
        let entries = convert_forecast_items(data.list);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].precipitation_mm, Decimal::new(25, 1));
        assert_eq!(entries[0].description, "light rain");
        assert_eq!(entries[1].precipitation_mm, Decimal::ZERO);
        assert_eq!(entries[1].humidity_percent, Decimal::from(80));
    }

    #[test]
    fn test_entries_aggregate_to_one_day() {
        let data: OWMForecastResponse = serde_json::from_str(SAMPLE).unwrap();
        let days = aggregate_daily(&convert_forecast_items(data.list));

        // 2024-07-01 00:00 and 03:00 UTC
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].precipitation_mm, Decimal::new(25, 1));
        assert_eq!(days[0].temp_max_celsius, Decimal::new(334, 1));
    }
}
