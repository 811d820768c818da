//! Weather service: cached forecasts, rain checks and reference ET

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use shared::{
    apply_rain_outlook, rain_outlook, GpsCoordinates, RainOutlook, UrgencyAssessment,
    WeatherForecast,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::EngineContext;

/// Weather service for forecast-driven adjustments
#[derive(Clone)]
pub struct WeatherService {
    ctx: Arc<EngineContext>,
}

impl WeatherService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Fetch forecast (from cache or provider)
    pub async fn get_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast> {
        // Check cache first
        if let Some(cached) = self.ctx.forecasts.get_cached_forecast(location).await? {
            if cached.is_fresh(Utc::now()) {
                tracing::debug!(lat = %location.latitude, lon = %location.longitude, "Forecast cache hit");
                return Ok(cached.forecast);
            }
        }
        tracing::debug!(lat = %location.latitude, lon = %location.longitude, "Forecast cache miss");

        // Fetch from provider
        let provider = self
            .ctx
            .provider
            .as_ref()
            .ok_or(AppError::WeatherServiceUnavailable)?;

        let timeout = std::time::Duration::from_secs(self.ctx.settings.provider_timeout_secs);
        let forecast = tokio::time::timeout(timeout, provider.fetch_forecast(location))
            .await
            .map_err(|_| {
                AppError::ExternalService(format!(
                    "Forecast provider timed out after {}s",
                    self.ctx.settings.provider_timeout_secs
                ))
            })??;

        // Cache the result
        let ttl = Duration::minutes(self.ctx.settings.forecast_ttl_minutes);
        if let Err(e) = self.ctx.forecasts.cache_forecast(location, &forecast, ttl).await {
            tracing::warn!("Failed to cache forecast: {}", e);
        }

        Ok(forecast)
    }

    /// Rain expected within `hours_ahead`.
    ///
    /// Best-effort: any failure reports no rain so the caller's decision
    /// goes ahead unadjusted.
    pub async fn is_rain_expected(
        &self,
        location: GpsCoordinates,
        hours_ahead: i64,
        threshold_mm: Decimal,
    ) -> RainOutlook {
        match self.get_forecast(location).await {
            Ok(forecast) => rain_outlook(&forecast, Utc::now(), hours_ahead, threshold_mm),
            Err(e) => {
                tracing::warn!(
                    lat = %location.latitude,
                    lon = %location.longitude,
                    "Rain check unavailable, proceeding without weather adjustment: {}",
                    e
                );
                RainOutlook::unavailable()
            }
        }
    }

    /// Reference evapotranspiration for today, mm/day
    pub async fn estimate_daily_et(&self, location: GpsCoordinates) -> Decimal {
        let today = Utc::now().date_naive();
        match self.get_forecast(location).await {
            Ok(forecast) => shared::estimate_daily_et(Some(&forecast), today),
            Err(e) => {
                tracing::warn!("ET estimate using default, forecast unavailable: {}", e);
                shared::estimate_daily_et(None, today)
            }
        }
    }

    /// Apply the configured rain check to a base urgency
    pub async fn adjust_for_rain(
        &self,
        base: UrgencyAssessment,
        location: GpsCoordinates,
    ) -> (UrgencyAssessment, Option<String>) {
        let hours = self.ctx.settings.rain_lookahead_hours;
        let outlook = self
            .is_rain_expected(location, hours, self.ctx.settings.rain_threshold_mm)
            .await;
        apply_rain_outlook(base, &outlook, hours)
    }
}
