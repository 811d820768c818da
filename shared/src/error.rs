//! Errors raised by the agronomic calculations

use rust_decimal::Decimal;
use thiserror::Error;

/// Input errors detected while running an agronomic calculation.
///
/// Every variant is a caller mistake: the calculations never substitute a
/// default for bad input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgronomyError {
    #[error("Unknown soil texture: {0}")]
    UnknownSoilTexture(String),

    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("Unknown growth stage: {0}")]
    UnknownGrowthStage(String),

    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: String, value: Decimal },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl AgronomyError {
    /// Name of the input that caused the error, when it maps to one field
    pub fn field(&self) -> &str {
        match self {
            AgronomyError::UnknownSoilTexture(_) => "soil_texture",
            AgronomyError::UnknownCrop(_) => "crop_type",
            AgronomyError::UnknownGrowthStage(_) => "growth_stage",
            AgronomyError::UnknownSeason(_) => "season",
            AgronomyError::OutOfRange { field, .. } => field,
            AgronomyError::InvalidParameters(_) => "parameters",
        }
    }
}

pub type AgronomyResult<T> = Result<T, AgronomyError>;
