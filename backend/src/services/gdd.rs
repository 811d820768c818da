//! Growing degree day accumulation per field

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{
    build_record, progress_percent, rechain, stage_for_cumulative, summarize_temperatures,
    validate_soil_temperature, CropParameters, DailyTemperature, DateRange, FieldConfig,
    GddRecord, GrowthSnapshot,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::{EngineContext, FieldService};

/// Explicit daily temperatures, e.g. a manual correction
#[derive(Debug, Clone, Deserialize)]
pub struct DailyTemperatureInput {
    pub avg_celsius: Decimal,
    pub min_celsius: Decimal,
    pub max_celsius: Decimal,
    #[serde(default)]
    pub reading_count: i32,
}

impl DailyTemperatureInput {
    fn validate(&self) -> AppResult<DailyTemperature> {
        for value in [self.avg_celsius, self.min_celsius, self.max_celsius] {
            validate_soil_temperature(value)?;
        }
        if self.min_celsius > self.max_celsius {
            return Err(AppError::validation(
                "min_celsius",
                "Minimum temperature cannot exceed maximum",
            ));
        }
        if self.avg_celsius < self.min_celsius || self.avg_celsius > self.max_celsius {
            return Err(AppError::validation(
                "avg_celsius",
                "Average temperature must lie between minimum and maximum",
            ));
        }
        if self.reading_count < 0 {
            return Err(AppError::validation("reading_count", "Reading count cannot be negative"));
        }
        Ok(DailyTemperature {
            avg_celsius: self.avg_celsius,
            min_celsius: self.min_celsius,
            max_celsius: self.max_celsius,
            reading_count: self.reading_count,
        })
    }
}

/// The active crop cycle of a field
struct CropCycle {
    crop: CropParameters,
    sowing_date: NaiveDate,
}

impl CropCycle {
    fn owns(&self, record: &GddRecord) -> bool {
        record.crop_type == self.crop.name && record.record_date >= self.sowing_date
    }
}

#[derive(Clone)]
pub struct GddService {
    ctx: Arc<EngineContext>,
}

impl GddService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Record thermal time for a date from explicit temperatures
    pub async fn record_daily_temperatures(
        &self,
        node_id: &str,
        date: NaiveDate,
        input: DailyTemperatureInput,
    ) -> AppResult<GddRecord> {
        let temperatures = input.validate()?;
        let cycle = self.active_cycle(node_id, date).await?;
        self.upsert_day(node_id, date, &temperatures, &cycle).await
    }

    /// Record thermal time for a date from that day's stored readings
    pub async fn recompute_from_readings(&self, node_id: &str, date: NaiveDate) -> AppResult<GddRecord> {
        let cycle = self.active_cycle(node_id, date).await?;

        let day_start = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));
        let readings = self
            .ctx
            .readings
            .readings_between(node_id, day_start, day_start + Duration::days(1))
            .await?;
        let temperatures: Vec<Decimal> = readings
            .iter()
            .filter_map(|r| r.soil_temperature_celsius)
            .collect();

        let summary = summarize_temperatures(&temperatures).ok_or_else(|| {
            AppError::NotFound(format!("Soil temperature readings for {} on {}", node_id, date))
        })?;

        self.upsert_day(node_id, date, &summary, &cycle).await
    }

    /// Crop development state of a field, derived from its accumulated GDD
    pub async fn growth_snapshot(&self, node_id: &str) -> AppResult<GrowthSnapshot> {
        let fields = FieldService::new(self.ctx.clone());
        let field = fields.get_field(node_id).await?;
        let crop = fields.active_crop(&field).await?;

        let progress = progress_percent(field.accumulated_gdd, crop.total_gdd);
        let today = Utc::now().date_naive();

        Ok(GrowthSnapshot {
            node_id: field.node_id,
            crop_type: crop.name.clone(),
            sowing_date: field.sowing_date,
            days_since_sowing: field.sowing_date.map(|d| (today - d).num_days()),
            accumulated_gdd: field.accumulated_gdd,
            total_gdd_required: crop.total_gdd,
            progress_percent: progress,
            gdd_remaining: (crop.total_gdd - field.accumulated_gdd).max(Decimal::ZERO),
            growth_stage: stage_for_cumulative(field.accumulated_gdd, &crop),
        })
    }

    /// Stored records for a field within an inclusive date range
    pub async fn gdd_history(&self, node_id: &str, range: DateRange) -> AppResult<Vec<GddRecord>> {
        if range.start > range.end {
            return Err(AppError::validation("start", "Range start must not be after its end"));
        }
        self.ctx.fields.get_field(node_id).await?;
        self.ctx.gdd.get_gdd_history(node_id, &range).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn active_cycle(&self, node_id: &str, date: NaiveDate) -> AppResult<CropCycle> {
        let fields = FieldService::new(self.ctx.clone());
        let field: FieldConfig = fields.get_field(node_id).await?;
        let crop = fields.active_crop(&field).await?;

        let sowing_date = field.sowing_date.ok_or_else(|| {
            AppError::validation("sowing_date", format!("Field {} has no sowing date", node_id))
        })?;
        if date < sowing_date {
            return Err(AppError::validation(
                "record_date",
                format!("{} is before the sowing date {}", date, sowing_date),
            ));
        }

        Ok(CropCycle { crop, sowing_date })
    }

    /// Upsert one day, re-chain every later day of the cycle, and store the
    /// field's resulting totals
    async fn upsert_day(
        &self,
        node_id: &str,
        date: NaiveDate,
        temperatures: &DailyTemperature,
        cycle: &CropCycle,
    ) -> AppResult<GddRecord> {
        let previous_cumulative = match date.pred_opt() {
            Some(day_before) if date > cycle.sowing_date => {
                let earlier = DateRange {
                    start: cycle.sowing_date,
                    end: day_before,
                };
                self.ctx
                    .gdd
                    .get_gdd_history(node_id, &earlier)
                    .await?
                    .into_iter()
                    .filter(|r| cycle.owns(r))
                    .last()
                    .map(|r| r.cumulative_gdd)
            }
            _ => None,
        };

        let record = build_record(node_id, date, temperatures, &cycle.crop, previous_cumulative);
        let stored = self.ctx.gdd.upsert_gdd_record(&record).await?;

        let later: Vec<GddRecord> = match date.succ_opt() {
            Some(next) => {
                let after = DateRange {
                    start: next,
                    end: NaiveDate::MAX,
                };
                self.ctx
                    .gdd
                    .get_gdd_history(node_id, &after)
                    .await?
                    .into_iter()
                    .filter(|r| cycle.owns(r))
                    .collect()
            }
            None => Vec::new(),
        };

        for changed in rechain(&later, stored.cumulative_gdd, &cycle.crop) {
            self.ctx.gdd.upsert_gdd_record(&changed).await?;
        }

        let final_cumulative = stored.cumulative_gdd + later.iter().map(|r| r.daily_gdd).sum::<Decimal>();
        let stage = stage_for_cumulative(final_cumulative, &cycle.crop);
        self.ctx.fields.update_growth(node_id, final_cumulative, stage).await?;

        tracing::info!(
            node_id = %node_id,
            date = %date,
            daily_gdd = %stored.daily_gdd,
            cumulative_gdd = %final_cumulative,
            stage = %stage,
            rechained = later.len(),
            "GDD recorded"
        );

        Ok(stored)
    }
}
