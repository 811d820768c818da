//! Irrigation urgency classification
//!
//! Urgency is decided by an ordered rule table evaluated top to bottom; the
//! first rule whose predicate holds wins.
//!
//! ```text
//! ┌────────────────────────────┬──────────────────────────┬──────────┐
//! │ rule                       │ predicate                │ outcome  │
//! ├────────────────────────────┼──────────────────────────┼──────────┤
//! │ in_band_near_optimal       │ min<=v<max, d < 0.3·h    │ NONE  0  │
//! │ in_band_drifting           │ min<=v<max, d < 0.7·h    │ LOW  20  │
//! │ in_band_edge               │ min<=v<max               │ LOW  30  │
//! │ severe_deficit             │ v<min, min-v > 5         │ CRIT 95  │
//! │ marked_deficit             │ v<min, min-v > 2         │ HIGH 80  │
//! │ slight_deficit             │ v<min                    │ MOD  60  │
//! │ at_or_above_band           │ v>=max                   │ NONE  0  │
//! ├────────────────────────────┼──────────────────────────┼──────────┤
//! │ depletion fallback ladder (never reached, see below)             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `d` is the distance from the optimal VWC and `h` half the band width.
//! The primary rules cover every VWC value, so the depletion ladder that
//! follows them can never fire from [`classify_urgency`]. It is kept as a
//! safety net and exposed separately so it can be exercised on its own.

use rust_decimal::Decimal;

use crate::models::{CropParameters, UrgencyAssessment, UrgencyLevel, WaterBalance};

/// Everything the urgency rules look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencyInput {
    pub vwc: Decimal,
    pub vwc_min: Decimal,
    pub vwc_optimal: Decimal,
    pub vwc_max: Decimal,
    pub depletion_percent: Decimal,
    pub mad: Decimal,
}

impl UrgencyInput {
    pub fn new(vwc: Decimal, balance: &WaterBalance, crop: &CropParameters) -> Self {
        Self {
            vwc,
            vwc_min: crop.vwc_min,
            vwc_optimal: crop.vwc_optimal,
            vwc_max: crop.vwc_max,
            depletion_percent: balance.depletion_percent,
            mad: crop.mad,
        }
    }

    fn in_band(&self) -> bool {
        self.vwc >= self.vwc_min && self.vwc < self.vwc_max
    }

    fn distance_from_optimal(&self) -> Decimal {
        (self.vwc - self.vwc_optimal).abs()
    }

    fn half_range(&self) -> Decimal {
        (self.vwc_max - self.vwc_min) / Decimal::TWO
    }

    fn deficit(&self) -> Decimal {
        self.vwc_min - self.vwc
    }
}

/// One row of an urgency rule table
pub struct UrgencyRule {
    pub name: &'static str,
    pub applies: fn(&UrgencyInput) -> bool,
    pub outcome: UrgencyAssessment,
}

fn in_band_near_optimal(i: &UrgencyInput) -> bool {
    i.in_band() && i.distance_from_optimal() < Decimal::new(3, 1) * i.half_range()
}

fn in_band_drifting(i: &UrgencyInput) -> bool {
    i.in_band() && i.distance_from_optimal() < Decimal::new(7, 1) * i.half_range()
}

fn in_band_edge(i: &UrgencyInput) -> bool {
    i.in_band()
}

fn severe_deficit(i: &UrgencyInput) -> bool {
    i.vwc < i.vwc_min && i.deficit() > Decimal::from(5)
}

fn marked_deficit(i: &UrgencyInput) -> bool {
    i.vwc < i.vwc_min && i.deficit() > Decimal::TWO
}

fn slight_deficit(i: &UrgencyInput) -> bool {
    i.vwc < i.vwc_min
}

fn at_or_above_band(i: &UrgencyInput) -> bool {
    i.vwc >= i.vwc_max
}

fn depletion_beyond_mad(i: &UrgencyInput) -> bool {
    i.depletion_percent > i.mad * Decimal::ONE_HUNDRED
}

fn depletion_near_mad(i: &UrgencyInput) -> bool {
    i.depletion_percent > i.mad * Decimal::from(80)
}

fn depletion_half_mad(i: &UrgencyInput) -> bool {
    i.depletion_percent > i.mad * Decimal::from(50)
}

fn always(_: &UrgencyInput) -> bool {
    true
}

/// VWC-band rules. Exhaustive over all VWC values.
pub static PRIMARY_RULES: &[UrgencyRule] = &[
    UrgencyRule {
        name: "in_band_near_optimal",
        applies: in_band_near_optimal,
        outcome: UrgencyAssessment::new(UrgencyLevel::None, 0),
    },
    UrgencyRule {
        name: "in_band_drifting",
        applies: in_band_drifting,
        outcome: UrgencyAssessment::new(UrgencyLevel::Low, 20),
    },
    UrgencyRule {
        name: "in_band_edge",
        applies: in_band_edge,
        outcome: UrgencyAssessment::new(UrgencyLevel::Low, 30),
    },
    UrgencyRule {
        name: "severe_deficit",
        applies: severe_deficit,
        outcome: UrgencyAssessment::new(UrgencyLevel::Critical, 95),
    },
    UrgencyRule {
        name: "marked_deficit",
        applies: marked_deficit,
        outcome: UrgencyAssessment::new(UrgencyLevel::High, 80),
    },
    UrgencyRule {
        name: "slight_deficit",
        applies: slight_deficit,
        outcome: UrgencyAssessment::new(UrgencyLevel::Moderate, 60),
    },
    UrgencyRule {
        name: "at_or_above_band",
        applies: at_or_above_band,
        outcome: UrgencyAssessment::new(UrgencyLevel::None, 0),
    },
];

/// Depletion ladder evaluated after the primary rules
pub static DEPLETION_FALLBACK_RULES: &[UrgencyRule] = &[
    UrgencyRule {
        name: "depletion_beyond_mad",
        applies: depletion_beyond_mad,
        outcome: UrgencyAssessment::new(UrgencyLevel::High, 80),
    },
    UrgencyRule {
        name: "depletion_near_mad",
        applies: depletion_near_mad,
        outcome: UrgencyAssessment::new(UrgencyLevel::Moderate, 60),
    },
    UrgencyRule {
        name: "depletion_half_mad",
        applies: depletion_half_mad,
        outcome: UrgencyAssessment::new(UrgencyLevel::Low, 30),
    },
    UrgencyRule {
        name: "depletion_within_budget",
        applies: always,
        outcome: UrgencyAssessment::new(UrgencyLevel::None, 0),
    },
];

const NO_URGENCY: UrgencyAssessment = UrgencyAssessment::new(UrgencyLevel::None, 0);

fn first_match(rules: &'static [UrgencyRule], input: &UrgencyInput) -> Option<&'static UrgencyRule> {
    rules.iter().find(|rule| (rule.applies)(input))
}

/// The rule that decides urgency for `input`
pub fn matching_rule(input: &UrgencyInput) -> Option<&'static UrgencyRule> {
    first_match(PRIMARY_RULES, input).or_else(|| first_match(DEPLETION_FALLBACK_RULES, input))
}

/// Evaluate only the depletion ladder
pub fn depletion_fallback(input: &UrgencyInput) -> UrgencyAssessment {
    first_match(DEPLETION_FALLBACK_RULES, input)
        .map(|rule| rule.outcome)
        .unwrap_or(NO_URGENCY)
}

pub fn classify(input: &UrgencyInput) -> UrgencyAssessment {
    matching_rule(input).map(|rule| rule.outcome).unwrap_or(NO_URGENCY)
}

/// Classify irrigation urgency for a field's current VWC
pub fn classify_urgency(
    current_vwc: Decimal,
    balance: &WaterBalance,
    crop: &CropParameters,
) -> UrgencyAssessment {
    classify(&UrgencyInput::new(current_vwc, balance, crop))
}
