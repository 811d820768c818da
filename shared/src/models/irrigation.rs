//! Irrigation decision models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AgronomyError;

/// Root-zone water budget, all depths in mm
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WaterBalance {
    /// Total available water between field capacity and wilting point
    pub taw_mm: Decimal,
    /// Readily available water before stress
    pub raw_mm: Decimal,
    /// Water currently held in the root zone
    pub current_depth_mm: Decimal,
    /// Depletion below field capacity as a percent of TAW
    pub depletion_percent: Decimal,
}

/// Irrigation urgency tiers, ordered from least to most urgent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    None,
    Low,
    Moderate,
    High,
    Critical,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLevel::None => write!(f, "NONE"),
            UrgencyLevel::Low => write!(f, "LOW"),
            UrgencyLevel::Moderate => write!(f, "MODERATE"),
            UrgencyLevel::High => write!(f, "HIGH"),
            UrgencyLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl FromStr for UrgencyLevel {
    type Err = AgronomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(UrgencyLevel::None),
            "LOW" => Ok(UrgencyLevel::Low),
            "MODERATE" => Ok(UrgencyLevel::Moderate),
            "HIGH" => Ok(UrgencyLevel::High),
            "CRITICAL" => Ok(UrgencyLevel::Critical),
            _ => Err(AgronomyError::InvalidParameters(format!(
                "unknown urgency level: {}",
                s
            ))),
        }
    }
}

/// An urgency tier with its numeric score (0-100)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrgencyAssessment {
    pub level: UrgencyLevel,
    pub score: i32,
}

impl UrgencyAssessment {
    pub const fn new(level: UrgencyLevel, score: i32) -> Self {
        Self { level, score }
    }
}

/// What the grower should do
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationAction {
    IrrigateNow,
    IrrigateSoon,
    DoNotIrrigate,
}

impl IrrigationAction {
    pub fn for_urgency(level: UrgencyLevel) -> Self {
        match level {
            UrgencyLevel::Critical | UrgencyLevel::High => IrrigationAction::IrrigateNow,
            UrgencyLevel::Moderate => IrrigationAction::IrrigateSoon,
            UrgencyLevel::Low | UrgencyLevel::None => IrrigationAction::DoNotIrrigate,
        }
    }

    /// Hours until the field should be re-evaluated
    pub fn next_check_hours(&self) -> i32 {
        match self {
            IrrigationAction::IrrigateNow => 6,
            IrrigationAction::IrrigateSoon => 12,
            IrrigationAction::DoNotIrrigate => 24,
        }
    }
}

impl std::fmt::Display for IrrigationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrrigationAction::IrrigateNow => write!(f, "irrigate_now"),
            IrrigationAction::IrrigateSoon => write!(f, "irrigate_soon"),
            IrrigationAction::DoNotIrrigate => write!(f, "do_not_irrigate"),
        }
    }
}

/// Irrigation decision for one field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrigationDecision {
    pub node_id: String,
    pub crop_type: String,
    pub current_vwc: Decimal,
    pub water_balance: WaterBalance,
    /// Urgency before any weather adjustment
    pub base_urgency: UrgencyLevel,
    pub urgency: UrgencyLevel,
    pub urgency_score: i32,
    pub decision: IrrigationAction,
    pub suggested_depth_mm: Decimal,
    pub suggested_duration_min: i32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_note: Option<String>,
    pub next_check_hours: i32,
    pub decided_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_order() {
        assert!(UrgencyLevel::None < UrgencyLevel::Low);
        assert!(UrgencyLevel::High < UrgencyLevel::Critical);
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(IrrigationAction::for_urgency(UrgencyLevel::Critical), IrrigationAction::IrrigateNow);
        assert_eq!(IrrigationAction::for_urgency(UrgencyLevel::High), IrrigationAction::IrrigateNow);
        assert_eq!(IrrigationAction::for_urgency(UrgencyLevel::Moderate), IrrigationAction::IrrigateSoon);
        assert_eq!(IrrigationAction::for_urgency(UrgencyLevel::Low), IrrigationAction::DoNotIrrigate);
        assert_eq!(IrrigationAction::for_urgency(UrgencyLevel::None), IrrigationAction::DoNotIrrigate);
    }

    #[test]
    fn test_next_check_hours() {
        assert_eq!(IrrigationAction::IrrigateNow.next_check_hours(), 6);
        assert_eq!(IrrigationAction::IrrigateSoon.next_check_hours(), 12);
        assert_eq!(IrrigationAction::DoNotIrrigate.next_check_hours(), 24);
    }

    #[test]
    fn test_action_serializes_snake_case() {
        let json = serde_json::to_string(&IrrigationAction::DoNotIrrigate).unwrap();
        assert_eq!(json, "\"do_not_irrigate\"");
    }
}
