//! Irrigation decisions: water balance, urgency and weather composed into
//! one recommendation per field

use chrono::Utc;
use serde::Serialize;
use shared::{
    calculate_water_balance, classify_urgency, decision_reason, suggested_depth_mm,
    suggested_duration_min, IrrigationAction, IrrigationDecision,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::{EngineContext, FieldService, WeatherService};

/// A node the batch could not decide for
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub node_id: String,
    pub error: String,
}

/// Result of a batch run: decisions by descending urgency score, and the
/// nodes that failed
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub decisions: Vec<IrrigationDecision>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Clone)]
pub struct IrrigationService {
    ctx: Arc<EngineContext>,
}

impl IrrigationService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Decide whether a field needs irrigation now
    pub async fn decide(&self, node_id: &str) -> AppResult<IrrigationDecision> {
        let fields = FieldService::new(self.ctx.clone());
        let field = fields.get_field(node_id).await?;
        let crop = fields.active_crop(&field).await?;

        let reading = self
            .ctx
            .readings
            .get_latest_reading(node_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sensor reading for {}", node_id)))?;
        let current_vwc = reading
            .vwc_percent
            .ok_or_else(|| AppError::NotFound(format!("Calibrated VWC for {}", node_id)))?;

        let balance = calculate_water_balance(field.soil_texture, current_vwc, crop.root_depth_cm, crop.mad)?;
        let base = classify_urgency(current_vwc, &balance, &crop);

        let (urgency, weather_note) = WeatherService::new(self.ctx.clone())
            .adjust_for_rain(base, field.coordinates)
            .await;

        let limits = &self.ctx.settings.irrigation;
        let depth = suggested_depth_mm(current_vwc, crop.vwc_optimal, crop.root_depth_cm, urgency.level, limits);
        let duration = suggested_duration_min(depth, limits);
        let action = IrrigationAction::for_urgency(urgency.level);
        let reason = decision_reason(current_vwc, &balance, &crop, urgency.level, weather_note.as_deref());

        tracing::info!(
            node_id = %node_id,
            crop = %crop.name,
            vwc = %current_vwc,
            base_urgency = %base.level,
            urgency = %urgency.level,
            decision = %action,
            "Irrigation decision"
        );

        Ok(IrrigationDecision {
            node_id: node_id.to_string(),
            crop_type: crop.name,
            current_vwc,
            water_balance: balance,
            base_urgency: base.level,
            urgency: urgency.level,
            urgency_score: urgency.score,
            decision: action,
            suggested_depth_mm: depth,
            suggested_duration_min: duration,
            reason,
            weather_note,
            next_check_hours: action.next_check_hours(),
            decided_at: Utc::now(),
        })
    }

    /// Decide for many fields. One node's failure is logged and reported
    /// but never aborts the others.
    pub async fn decide_batch(&self, node_ids: &[String]) -> BatchOutcome {
        let mut decisions = Vec::with_capacity(node_ids.len());
        let mut failures = Vec::new();

        for node_id in node_ids {
            match self.decide(node_id).await {
                Ok(decision) => decisions.push(decision),
                Err(e) => {
                    tracing::warn!(node_id = %node_id, "Batch irrigation decision failed: {}", e);
                    failures.push(BatchFailure {
                        node_id: node_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        decisions.sort_by(|a, b| b.urgency_score.cmp(&a.urgency_score));

        BatchOutcome { decisions, failures }
    }
}
