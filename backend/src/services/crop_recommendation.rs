//! Crop suitability ranking for a field

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use shared::{rank_crops, round_half_up, season_for_date, CropRecommendationList, FieldConditions};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::EngineContext;
use crate::store::CatalogFilter;

/// Days of readings averaged for the thermal fit
const RECENT_TEMPERATURE_DAYS: i64 = 7;

#[derive(Clone)]
pub struct CropRecommendationService {
    ctx: Arc<EngineContext>,
}

impl CropRecommendationService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Rank the catalog for a field, returning the best `top_n` crops
    pub async fn recommend(&self, node_id: &str, top_n: Option<usize>) -> AppResult<CropRecommendationList> {
        let top_n = top_n.unwrap_or(self.ctx.settings.default_top_n);
        if top_n == 0 {
            return Err(AppError::validation("top_n", "top_n must be at least 1"));
        }

        let field = self.ctx.fields.get_field(node_id).await?;
        let latest = self
            .ctx
            .readings
            .get_latest_reading(node_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sensor reading for {}", node_id)))?;
        let vwc = latest
            .vwc_percent
            .ok_or_else(|| AppError::NotFound(format!("Calibrated VWC for {}", node_id)))?;

        let now = Utc::now();
        let recent = self
            .ctx
            .readings
            .readings_between(node_id, now - Duration::days(RECENT_TEMPERATURE_DAYS), now + Duration::seconds(1))
            .await?;
        let temperatures: Vec<Decimal> = recent.iter().filter_map(|r| r.soil_temperature_celsius).collect();
        let avg_temperature = if temperatures.is_empty() {
            latest.soil_temperature_celsius.ok_or_else(|| {
                AppError::NotFound(format!("Soil temperature reading for {}", node_id))
            })?
        } else {
            let sum: Decimal = temperatures.iter().sum();
            round_half_up(sum / Decimal::from(temperatures.len() as i64), 2)
        };

        let season = season_for_date(now.date_naive(), field.coordinates.is_southern_hemisphere());
        let catalog = self
            .ctx
            .catalog
            .list_catalog(CatalogFilter {
                region_only: self.ctx.settings.region_only_catalog,
            })
            .await?;

        let conditions = FieldConditions {
            vwc,
            soil_texture: field.soil_texture,
            avg_temperature,
            season,
        };
        let recommendations = rank_crops(&catalog, &conditions, top_n);

        tracing::info!(
            node_id = %node_id,
            season = %season,
            candidates = catalog.len(),
            top = recommendations.first().map(|r| r.crop_name.as_str()).unwrap_or("-"),
            "Crop recommendations ranked"
        );

        Ok(CropRecommendationList {
            node_id: node_id.to_string(),
            season,
            recommendations,
        })
    }
}
