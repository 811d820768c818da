//! Growing degree day accumulation and growth-stage selection

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{CropParameters, DailyTemperature, GddRecord, GrowthStage, StageThresholds};
use crate::types::round_half_up;

/// Thermal time for one day: `max(0, avg - base)`
pub fn daily_gdd(avg_temperature: Decimal, base_temperature: Decimal) -> Decimal {
    round_half_up((avg_temperature - base_temperature).max(Decimal::ZERO), 2)
}

/// Unrounded percent of the crop's total GDD reached, capped at 100.
/// Stage selection compares against this value.
pub fn exact_progress_percent(cumulative_gdd: Decimal, total_gdd: Decimal) -> Decimal {
    if total_gdd <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    (cumulative_gdd / total_gdd * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
}

/// Percent of the crop's total GDD reached, capped at 100, for reporting
pub fn progress_percent(cumulative_gdd: Decimal, total_gdd: Decimal) -> Decimal {
    round_half_up(exact_progress_percent(cumulative_gdd, total_gdd), 1)
}

/// Growth stage for a progress percentage.
///
/// Purely a function of progress: a lower cumulative GDD after a data
/// correction yields an earlier stage.
pub fn stage_for_progress(progress: Decimal, thresholds: &StageThresholds) -> GrowthStage {
    if progress < thresholds.initial_end {
        GrowthStage::Initial
    } else if progress < thresholds.development_end {
        GrowthStage::Development
    } else if progress < thresholds.mid_season_end {
        GrowthStage::MidSeason
    } else if progress < thresholds.late_season_end {
        GrowthStage::LateSeason
    } else {
        GrowthStage::HarvestReady
    }
}

/// Growth stage of a crop at a cumulative GDD
pub fn stage_for_cumulative(cumulative_gdd: Decimal, crop: &CropParameters) -> GrowthStage {
    stage_for_progress(
        exact_progress_percent(cumulative_gdd, crop.total_gdd),
        &crop.stage_thresholds,
    )
}

/// Build the record for `date`, chaining onto the previous record's
/// cumulative GDD (`None` for the first day of a crop cycle).
pub fn build_record(
    node_id: &str,
    date: NaiveDate,
    temperature: &DailyTemperature,
    crop: &CropParameters,
    previous_cumulative: Option<Decimal>,
) -> GddRecord {
    let daily = daily_gdd(temperature.avg_celsius, crop.base_temperature);
    let cumulative = previous_cumulative.unwrap_or(Decimal::ZERO) + daily;

    GddRecord {
        node_id: node_id.to_string(),
        record_date: date,
        avg_temperature: temperature.avg_celsius,
        min_temperature: temperature.min_celsius,
        max_temperature: temperature.max_celsius,
        reading_count: temperature.reading_count,
        daily_gdd: daily,
        cumulative_gdd: cumulative,
        crop_type: crop.name.clone(),
        base_temperature: crop.base_temperature,
        growth_stage: stage_for_cumulative(cumulative, crop),
    }
}

/// Re-chain cumulative GDD across records ordered by date.
///
/// Each record's cumulative becomes the previous cumulative plus its own
/// daily GDD, starting from `starting_cumulative`. Returns the records whose
/// cumulative or stage changed.
pub fn rechain(
    records: &[GddRecord],
    starting_cumulative: Decimal,
    crop: &CropParameters,
) -> Vec<GddRecord> {
    let mut running = starting_cumulative;
    let mut changed = Vec::new();

    for record in records {
        running += record.daily_gdd;
        let stage = stage_for_cumulative(running, crop);
        if record.cumulative_gdd != running || record.growth_stage != stage {
            changed.push(GddRecord {
                cumulative_gdd: running,
                growth_stage: stage,
                ..record.clone()
            });
        }
    }

    changed
}

/// Mean/min/max of a day's soil temperatures; `None` when there are none
pub fn summarize_temperatures(temperatures: &[Decimal]) -> Option<DailyTemperature> {
    let min = temperatures.iter().copied().min()?;
    let max = temperatures.iter().copied().max()?;
    let sum: Decimal = temperatures.iter().copied().sum();
    let count = temperatures.len() as i64;

    Some(DailyTemperature {
        avg_celsius: round_half_up(sum / Decimal::from(count), 2),
        min_celsius: min,
        max_celsius: max,
        reading_count: count as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::find_default_crop;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn temps(avg: &str) -> DailyTemperature {
        DailyTemperature {
            avg_celsius: dec(avg),
            min_celsius: dec(avg) - Decimal::from(4),
            max_celsius: dec(avg) + Decimal::from(4),
            reading_count: 24,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    #[test]
    fn test_daily_gdd_zero_at_or_below_base() {
        assert_eq!(daily_gdd(dec("5"), dec("5")), Decimal::ZERO);
        assert_eq!(daily_gdd(dec("2.5"), dec("5")), Decimal::ZERO);
        assert_eq!(daily_gdd(dec("17.25"), dec("5")), dec("12.25"));
    }

    #[test]
    fn test_progress_capped() {
        assert_eq!(progress_percent(dec("825"), dec("1650")), dec("50"));
        assert_eq!(progress_percent(dec("5000"), dec("1650")), dec("100"));
    }

    #[test]
    fn test_stage_boundaries() {
        let t = StageThresholds::new(15, 40, 75, 100);
        assert_eq!(stage_for_progress(dec("0"), &t), GrowthStage::Initial);
        assert_eq!(stage_for_progress(dec("14.9"), &t), GrowthStage::Initial);
        assert_eq!(stage_for_progress(dec("15"), &t), GrowthStage::Development);
        assert_eq!(stage_for_progress(dec("40"), &t), GrowthStage::MidSeason);
        assert_eq!(stage_for_progress(dec("75"), &t), GrowthStage::LateSeason);
        assert_eq!(stage_for_progress(dec("99.9"), &t), GrowthStage::LateSeason);
        assert_eq!(stage_for_progress(dec("100"), &t), GrowthStage::HarvestReady);
    }

    #[test]
    fn test_build_record_chains_cumulative() {
        let wheat = find_default_crop("Wheat").unwrap();
        let first = build_record("node-1", date(1), &temps("15"), &wheat, None);
        assert_eq!(first.daily_gdd, dec("10"));
        assert_eq!(first.cumulative_gdd, dec("10"));

        let second = build_record("node-1", date(2), &temps("17"), &wheat, Some(first.cumulative_gdd));
        assert_eq!(second.daily_gdd, dec("12"));
        assert_eq!(second.cumulative_gdd, dec("22"));
        assert_eq!(second.crop_type, "Wheat");
        assert_eq!(second.base_temperature, dec("5"));
    }

    #[test]
    fn test_stage_regresses_on_lower_cumulative() {
        let wheat = find_default_crop("Wheat").unwrap();
        // 15% of 1650 = 247.5
        assert_eq!(stage_for_cumulative(dec("250"), &wheat), GrowthStage::Development);
        assert_eq!(stage_for_cumulative(dec("240"), &wheat), GrowthStage::Initial);
    }

    #[test]
    fn test_stage_boundary_uses_unrounded_progress() {
        let wheat = find_default_crop("Wheat").unwrap();
        // 247 / 1650 = 14.97%, reported as 15.0 but still short of 15
        assert_eq!(progress_percent(dec("247"), wheat.total_gdd), dec("15.0"));
        assert_eq!(stage_for_cumulative(dec("247"), &wheat), GrowthStage::Initial);
        assert_eq!(stage_for_cumulative(dec("247.5"), &wheat), GrowthStage::Development);

        let record = build_record("n", date(1), &temps("252"), &wheat, None);
        assert_eq!(record.cumulative_gdd, dec("247"));
        assert_eq!(record.growth_stage, GrowthStage::Initial);
    }

    #[test]
    fn test_rechain_after_correction() {
        let wheat = find_default_crop("Wheat").unwrap();
        let d1 = build_record("n", date(1), &temps("15"), &wheat, None);
        let d2 = build_record("n", date(2), &temps("15"), &wheat, Some(d1.cumulative_gdd));
        let d3 = build_record("n", date(3), &temps("15"), &wheat, Some(d2.cumulative_gdd));
        assert_eq!(d3.cumulative_gdd, dec("30"));

        // Day 1 corrected to 20 °C: cumulative 15
        let changed = rechain(&[d2.clone(), d3.clone()], dec("15"), &wheat);
        assert_eq!(changed.len(), 2);
        assert_eq!(changed[0].cumulative_gdd, dec("25"));
        assert_eq!(changed[1].cumulative_gdd, dec("35"));
    }

    #[test]
    fn test_rechain_unchanged_records_skipped() {
        let wheat = find_default_crop("Wheat").unwrap();
        let d1 = build_record("n", date(1), &temps("15"), &wheat, None);
        let d2 = build_record("n", date(2), &temps("15"), &wheat, Some(d1.cumulative_gdd));
        assert!(rechain(&[d2], d1.cumulative_gdd, &wheat).is_empty());
    }

    #[test]
    fn test_summarize_temperatures() {
        let summary = summarize_temperatures(&[dec("20"), dec("24"), dec("25")]).unwrap();
        assert_eq!(summary.avg_celsius, dec("23"));
        assert_eq!(summary.min_celsius, dec("20"));
        assert_eq!(summary.max_celsius, dec("25"));
        assert_eq!(summary.reading_count, 3);
        assert!(summarize_temperatures(&[]).is_none());
    }
}
