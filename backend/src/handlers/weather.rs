//! HTTP handlers for weather lookups

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_coordinates, validate_lookahead_hours, GpsCoordinates, RainOutlook, WeatherForecast};

use crate::error::{AppError, AppResult};
use crate::services::WeatherService;
use crate::AppState;

/// Query parameters locating a forecast
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl LocationQuery {
    fn coordinates(&self) -> AppResult<GpsCoordinates> {
        validate_coordinates(self.latitude, self.longitude)
            .map_err(|msg| AppError::validation("coordinates", msg))?;
        Ok(GpsCoordinates::new(self.latitude, self.longitude))
    }
}

/// Query parameters for a rain check
#[derive(Debug, Deserialize)]
pub struct RainQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub hours: Option<i64>,
    pub threshold_mm: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct RainResponse {
    #[serde(flatten)]
    pub outlook: RainOutlook,
    pub hours_ahead: i64,
    pub threshold_mm: Decimal,
}

#[derive(Debug, Serialize)]
pub struct EtResponse {
    pub et_mm_per_day: Decimal,
}

/// Get the daily forecast for a location
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<WeatherForecast>> {
    let location = query.coordinates()?;
    let service = WeatherService::new(state.engine.clone());
    let forecast = service.get_forecast(location).await?;
    Ok(Json(forecast))
}

/// Check whether rain is expected within a lookahead window
pub async fn check_rain(
    State(state): State<AppState>,
    Query(query): Query<RainQuery>,
) -> AppResult<Json<RainResponse>> {
    let location = LocationQuery {
        latitude: query.latitude,
        longitude: query.longitude,
    }
    .coordinates()?;

    let settings = &state.engine.settings;
    let hours = query.hours.unwrap_or(settings.rain_lookahead_hours);
    validate_lookahead_hours(hours).map_err(|msg| AppError::validation("hours", msg))?;
    let threshold_mm = query.threshold_mm.unwrap_or(settings.rain_threshold_mm);
    if threshold_mm < Decimal::ZERO {
        return Err(AppError::validation("threshold_mm", "Rain threshold cannot be negative"));
    }

    let service = WeatherService::new(state.engine.clone());
    let outlook = service.is_rain_expected(location, hours, threshold_mm).await;
    Ok(Json(RainResponse {
        outlook,
        hours_ahead: hours,
        threshold_mm,
    }))
}

/// Estimate today's reference evapotranspiration
pub async fn get_daily_et(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<EtResponse>> {
    let location = query.coordinates()?;
    let service = WeatherService::new(state.engine.clone());
    Ok(Json(EtResponse {
        et_mm_per_day: service.estimate_daily_et(location).await,
    }))
}
