//! Forecast aggregation, rain checks, urgency downgrade and reference ET

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{
    DailyForecast, ForecastEntry, RainOutlook, UrgencyAssessment, UrgencyLevel, WeatherForecast,
};
use crate::types::round_half_up;

/// Reference ET reported when no forecast is available, mm/day
pub const DEFAULT_DAILY_ET_MM: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// Score points removed when a tier is lowered for rain
const RAIN_DOWNGRADE_POINTS: i32 = 30;

/// Group raw provider entries into one row per UTC calendar date.
///
/// Max of the entry maxima, min of the minima, mean temperature, mean
/// humidity, summed precipitation, and the first description of the day.
pub fn aggregate_daily(entries: &[ForecastEntry]) -> Vec<DailyForecast> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.timestamp.date_naive()).or_default().push(entry);
    }

    by_date
        .into_iter()
        .filter_map(|(date, mut items)| {
            items.sort_by_key(|e| e.timestamp);
            let first = items.first()?;
            let count = Decimal::from(items.len() as i64);

            let temp_max = items.iter().map(|e| e.temp_max_celsius).max()?;
            let temp_min = items.iter().map(|e| e.temp_min_celsius).min()?;
            let temp_sum: Decimal = items.iter().map(|e| e.temperature_celsius).sum();
            let humidity_sum: Decimal = items.iter().map(|e| e.humidity_percent).sum();
            let precipitation: Decimal = items.iter().map(|e| e.precipitation_mm).sum();

            Some(DailyForecast {
                date,
                temp_max_celsius: temp_max,
                temp_min_celsius: temp_min,
                temp_avg_celsius: round_half_up(temp_sum / count, 2),
                humidity_percent: round_half_up(humidity_sum / count, 1),
                precipitation_mm: round_half_up(precipitation, 2),
                description: first.description.clone(),
            })
        })
        .collect()
}

/// Total precipitation over days up to `now + hours_ahead`
pub fn rain_outlook(
    forecast: &WeatherForecast,
    now: DateTime<Utc>,
    hours_ahead: i64,
    threshold_mm: Decimal,
) -> RainOutlook {
    let cutoff = (now + Duration::hours(hours_ahead)).date_naive();
    let total_mm: Decimal = forecast
        .days
        .iter()
        .filter(|day| day.date <= cutoff)
        .map(|day| day.precipitation_mm)
        .sum();

    RainOutlook {
        expected: total_mm >= threshold_mm,
        total_mm: round_half_up(total_mm, 2),
    }
}

/// Lower urgency one tier when rain is on the way.
///
/// CRITICAL is never downgraded: crop stress outweighs forecast uncertainty.
pub fn downgrade_for_rain(assessment: UrgencyAssessment) -> UrgencyAssessment {
    match assessment.level {
        UrgencyLevel::Critical => assessment,
        UrgencyLevel::High => {
            UrgencyAssessment::new(UrgencyLevel::Moderate, (assessment.score - RAIN_DOWNGRADE_POINTS).max(50))
        }
        UrgencyLevel::Moderate => {
            UrgencyAssessment::new(UrgencyLevel::Low, (assessment.score - RAIN_DOWNGRADE_POINTS).max(20))
        }
        UrgencyLevel::Low => UrgencyAssessment::new(UrgencyLevel::None, 0),
        UrgencyLevel::None => assessment,
    }
}

/// Apply the rain outlook to a base assessment, returning the final
/// assessment and a note describing what the forecast changed.
pub fn apply_rain_outlook(
    base: UrgencyAssessment,
    outlook: &RainOutlook,
    hours_ahead: i64,
) -> (UrgencyAssessment, Option<String>) {
    if !outlook.expected {
        return (base, None);
    }

    let adjusted = downgrade_for_rain(base);
    let note = if adjusted.level != base.level {
        format!(
            "Rain expected: {} mm within {} h; urgency lowered from {} to {}",
            outlook.total_mm, hours_ahead, base.level, adjusted.level
        )
    } else if base.level == UrgencyLevel::Critical {
        format!(
            "Rain expected: {} mm within {} h, but the deficit is critical; irrigation not deferred",
            outlook.total_mm, hours_ahead
        )
    } else {
        format!("Rain expected: {} mm within {} h", outlook.total_mm, hours_ahead)
    };

    (adjusted, Some(note))
}

/// Simplified Hargreaves reference evapotranspiration for one day, mm/day.
///
/// Floored at 1.0 mm/day; the temperature range is floored at 1 °C.
pub fn hargreaves_et0(day: &DailyForecast) -> Decimal {
    let coefficient = Decimal::new(135, 4);
    let offset = Decimal::new(178, 1);
    let range = (day.temp_max_celsius - day.temp_min_celsius).max(Decimal::ONE);
    let et0 = coefficient * (day.temp_avg_celsius + offset) * range;
    round_half_up(et0.max(Decimal::ONE), 2)
}

/// Daily ET for the first forecast day dated `today` or later, or the
/// default when none exists. Rows for past dates in a cached forecast are
/// skipped.
pub fn estimate_daily_et(forecast: Option<&WeatherForecast>, today: NaiveDate) -> Decimal {
    forecast
        .and_then(|f| f.days.iter().find(|d| d.date >= today))
        .map(hargreaves_et0)
        .unwrap_or(DEFAULT_DAILY_ET_MM)
}
