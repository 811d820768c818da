//! Field configuration and crop cycle management

use chrono::NaiveDate;
use serde::Deserialize;
use shared::{AgronomyError, CropParameters, FieldConfig};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::EngineContext;

/// Input for confirming the crop planted in a field
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmCropInput {
    pub crop_type: String,
    pub sowing_date: NaiveDate,
}

#[derive(Clone)]
pub struct FieldService {
    ctx: Arc<EngineContext>,
}

impl FieldService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub async fn get_field(&self, node_id: &str) -> AppResult<FieldConfig> {
        self.ctx.fields.get_field(node_id).await
    }

    /// Start a crop cycle for a field.
    ///
    /// Replaces any previous cycle: thermal time restarts at zero and the
    /// stage returns to INITIAL.
    pub async fn confirm_crop(&self, node_id: &str, input: ConfirmCropInput) -> AppResult<FieldConfig> {
        // Field must exist before the crop is checked
        self.ctx.fields.get_field(node_id).await?;

        let crop = self.crop_parameters(&input.crop_type).await?;
        let field = self
            .ctx
            .fields
            .start_crop_cycle(node_id, &crop.name, input.sowing_date)
            .await?;

        tracing::info!(
            node_id = %node_id,
            crop = %crop.name,
            sowing_date = %input.sowing_date,
            "Crop cycle started"
        );

        Ok(field)
    }

    /// Parameters for a crop name; unknown crops are a validation error
    pub async fn crop_parameters(&self, crop_type: &str) -> AppResult<CropParameters> {
        self.ctx
            .catalog
            .get_crop_parameters(crop_type)
            .await?
            .ok_or_else(|| AgronomyError::UnknownCrop(crop_type.to_string()).into())
    }

    /// The field's confirmed crop and its parameters
    pub async fn active_crop(&self, field: &FieldConfig) -> AppResult<CropParameters> {
        let crop_type = field.active_crop().ok_or_else(|| {
            AppError::validation(
                "crop_type",
                format!("Field {} has no confirmed crop", field.node_id),
            )
        })?;
        self.crop_parameters(crop_type).await
    }
}
