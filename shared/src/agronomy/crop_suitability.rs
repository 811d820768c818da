//! Multi-criteria crop suitability scoring

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    CropParameters, CropRecommendation, Season, SoilTexture, SuitabilityFactors,
};
use crate::types::{clamp_decimal, round_half_up};

const TEXTURE_WEIGHT: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
const MOISTURE_WEIGHT: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
const THERMAL_WEIGHT: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
const SEASON_WEIGHT: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Fit given to a crop grown outside its preferred textures
const TEXTURE_MISMATCH_FIT: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

/// Field conditions a crop is scored against
#[derive(Debug, Clone, Copy)]
pub struct FieldConditions {
    pub vwc: Decimal,
    pub soil_texture: SoilTexture,
    /// Recent mean soil temperature, °C
    pub avg_temperature: Decimal,
    pub season: Season,
}

/// The cropping season a calendar date falls in.
///
/// Southern-hemisphere fields have their month shifted by six so the
/// monsoon/winter split lines up.
pub fn season_for_date(date: NaiveDate, southern_hemisphere: bool) -> Season {
    let month = if southern_hemisphere {
        (date.month() + 5) % 12 + 1
    } else {
        date.month()
    };
    match month {
        6..=10 => Season::Kharif,
        4 | 5 => Season::Zaid,
        _ => Season::Rabi,
    }
}

fn texture_fit(crop: &CropParameters, texture: SoilTexture) -> Decimal {
    if crop.prefers(texture) {
        Decimal::ONE
    } else {
        TEXTURE_MISMATCH_FIT
    }
}

fn moisture_fit(crop: &CropParameters, vwc: Decimal) -> Decimal {
    if vwc < crop.vwc_min || vwc > crop.vwc_max {
        return Decimal::ZERO;
    }
    let span = if vwc < crop.vwc_optimal {
        crop.vwc_optimal - crop.vwc_min
    } else {
        crop.vwc_max - crop.vwc_optimal
    };
    if span.is_zero() {
        return Decimal::ONE;
    }
    clamp_decimal(
        Decimal::ONE - (vwc - crop.vwc_optimal).abs() / span,
        Decimal::ZERO,
        Decimal::ONE,
    )
}

fn thermal_fit(crop: &CropParameters, avg_temperature: Decimal) -> Decimal {
    let margin = avg_temperature - crop.base_temperature;
    let ramp = Decimal::from(15);
    let plateau_end = Decimal::from(25);
    if margin <= Decimal::ZERO {
        Decimal::ZERO
    } else if margin <= ramp {
        margin / ramp
    } else if margin <= plateau_end {
        Decimal::ONE
    } else {
        (Decimal::ONE - (margin - plateau_end) / Decimal::TEN).max(Decimal::ZERO)
    }
}

fn season_fit(crop: &CropParameters, season: Season) -> Decimal {
    if crop.season == Season::Perennial || crop.season == season {
        Decimal::ONE
    } else {
        Decimal::ZERO
    }
}

/// Factor fits for a crop under the given conditions
pub fn suitability_factors(crop: &CropParameters, field: &FieldConditions) -> SuitabilityFactors {
    SuitabilityFactors {
        texture: round_half_up(texture_fit(crop, field.soil_texture), 3),
        moisture: round_half_up(moisture_fit(crop, field.vwc), 3),
        thermal: round_half_up(thermal_fit(crop, field.avg_temperature), 3),
        season: season_fit(crop, field.season),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Factor {
    Texture,
    Moisture,
    Thermal,
    Season,
}

fn weighted(factors: &SuitabilityFactors) -> [(Factor, Decimal, Decimal); 4] {
    [
        (Factor::Texture, factors.texture, factors.texture * TEXTURE_WEIGHT),
        (Factor::Moisture, factors.moisture, factors.moisture * MOISTURE_WEIGHT),
        (Factor::Thermal, factors.thermal, factors.thermal * THERMAL_WEIGHT),
        (Factor::Season, factors.season, factors.season * SEASON_WEIGHT),
    ]
}

fn describe_strength(factor: Factor, crop: &CropParameters, field: &FieldConditions) -> String {
    match factor {
        Factor::Texture => format!("{} soil suits {}", field.soil_texture.label(), crop.name),
        Factor::Moisture => format!(
            "soil moisture {}% is close to the {}% optimum",
            field.vwc, crop.vwc_optimal
        ),
        Factor::Thermal => format!(
            "soil temperature {} °C is well above the {} °C base",
            field.avg_temperature, crop.base_temperature
        ),
        Factor::Season => format!("{} is sown in the {} season", crop.name, field.season),
    }
}

fn describe_weakness(factor: Factor, crop: &CropParameters, field: &FieldConditions) -> String {
    match factor {
        Factor::Texture => format!("{} soil is not preferred", field.soil_texture.label()),
        Factor::Moisture => format!(
            "moisture {}% is outside or far from the {}-{}% band",
            field.vwc, crop.vwc_min, crop.vwc_max
        ),
        Factor::Thermal => format!(
            "soil temperature {} °C is a poor match for the {} °C base",
            field.avg_temperature, crop.base_temperature
        ),
        Factor::Season => format!("out of season ({} crop)", crop.season),
    }
}

/// Score one crop (0-100) and explain the score
pub fn score_crop(crop: &CropParameters, field: &FieldConditions) -> CropRecommendation {
    let factors = suitability_factors(crop, field);
    let contributions = weighted(&factors);

    let total: Decimal = contributions.iter().map(|(_, _, c)| *c).sum();
    let score = round_half_up(
        clamp_decimal(total * Decimal::ONE_HUNDRED, Decimal::ZERO, Decimal::ONE_HUNDRED),
        1,
    );

    // First maximum wins so ties resolve in a fixed factor order
    let dominant = contributions
        .iter()
        .fold(None::<&(Factor, Decimal, Decimal)>, |best, item| match best {
            Some(b) if b.2 >= item.2 => Some(b),
            _ => Some(item),
        })
        .map(|(factor, _, _)| *factor)
        .unwrap_or(Factor::Texture);

    let weakest = contributions
        .iter()
        .filter(|(factor, fit, _)| *factor != dominant && *fit < Decimal::new(5, 1))
        .min_by(|a, b| a.1.cmp(&b.1))
        .map(|(factor, _, _)| *factor);

    let mut reason = describe_strength(dominant, crop, field);
    if let Some(weak) = weakest {
        reason.push_str("; ");
        reason.push_str(&describe_weakness(weak, crop, field));
    }

    CropRecommendation {
        crop_name: crop.name.clone(),
        suitability_score: score,
        reason,
        factors,
    }
}

/// Rank the catalog for a field, best first, returning at most `top_n`.
///
/// Equal scores keep catalog order.
pub fn rank_crops(
    catalog: &[CropParameters],
    field: &FieldConditions,
    top_n: usize,
) -> Vec<CropRecommendation> {
    let mut ranked: Vec<CropRecommendation> =
        catalog.iter().map(|crop| score_crop(crop, field)).collect();
    ranked.sort_by(|a, b| b.suitability_score.cmp(&a.suitability_score));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_catalog, find_default_crop, StageThresholds};

    fn conditions(vwc: i64, texture: SoilTexture, temp: i64, season: Season) -> FieldConditions {
        FieldConditions {
            vwc: Decimal::from(vwc),
            soil_texture: texture,
            avg_temperature: Decimal::from(temp),
            season,
        }
    }

    fn crop(name: &str, optimal: i64, textures: Vec<SoilTexture>) -> CropParameters {
        CropParameters {
            name: name.to_string(),
            base_temperature: Decimal::from(8),
            total_gdd: Decimal::from(1500),
            vwc_min: Decimal::from(optimal - 6),
            vwc_optimal: Decimal::from(optimal),
            vwc_max: Decimal::from(optimal + 6),
            root_depth_cm: Decimal::from(60),
            mad: Decimal::new(5, 1),
            stage_thresholds: StageThresholds::new(15, 40, 75, 100),
            preferred_textures: textures,
            season: Season::Rabi,
            up_region_valid: true,
        }
    }

    #[test]
    fn test_season_for_date() {
        let d = |m| NaiveDate::from_ymd_opt(2024, m, 15).unwrap();
        assert_eq!(season_for_date(d(7), false), Season::Kharif);
        assert_eq!(season_for_date(d(12), false), Season::Rabi);
        assert_eq!(season_for_date(d(2), false), Season::Rabi);
        assert_eq!(season_for_date(d(4), false), Season::Zaid);
        // January in the south maps to July
        assert_eq!(season_for_date(d(1), true), Season::Kharif);
    }

    #[test]
    fn test_matching_crop_outranks_mismatched_crop() {
        let field = conditions(28, SoilTexture::Loam, 18, Season::Rabi);
        let good = crop("Good", 28, vec![SoilTexture::Loam]);
        let poor = crop("Poor", 40, vec![SoilTexture::Clay]);

        let ranked = rank_crops(&[poor, good], &field, 5);
        assert_eq!(ranked[0].crop_name, "Good");
        assert!(ranked[0].suitability_score > ranked[1].suitability_score);
    }

    #[test]
    fn test_perfect_fit_scores_100() {
        // margin 10 -> thermal 10/15; use margin 15 for a full thermal fit
        let field = conditions(28, SoilTexture::Loam, 23, Season::Rabi);
        let result = score_crop(&crop("Ideal", 28, vec![SoilTexture::Loam]), &field);
        assert_eq!(result.suitability_score, Decimal::from(100));
    }

    #[test]
    fn test_moisture_fit_zero_outside_band() {
        let c = crop("C", 28, vec![SoilTexture::Loam]);
        assert_eq!(moisture_fit(&c, Decimal::from(21)), Decimal::ZERO);
        assert_eq!(moisture_fit(&c, Decimal::from(35)), Decimal::ZERO);
        assert_eq!(moisture_fit(&c, Decimal::from(25)), Decimal::new(5, 1));
    }

    #[test]
    fn test_thermal_fit_shape() {
        let c = crop("C", 28, vec![]);
        assert_eq!(thermal_fit(&c, Decimal::from(5)), Decimal::ZERO);
        assert_eq!(thermal_fit(&c, Decimal::from(20)), Decimal::new(8, 1));
        assert_eq!(thermal_fit(&c, Decimal::from(30)), Decimal::ONE);
        assert_eq!(thermal_fit(&c, Decimal::from(38)), Decimal::new(5, 1));
        assert_eq!(thermal_fit(&c, Decimal::from(60)), Decimal::ZERO);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let field = conditions(28, SoilTexture::Loam, 23, Season::Rabi);
        let first = crop("First", 28, vec![SoilTexture::Loam]);
        let second = crop("Second", 28, vec![SoilTexture::Loam]);
        let third = crop("Third", 28, vec![SoilTexture::Loam]);

        let ranked = rank_crops(&[first, second, third], &field, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].crop_name, "First");
        assert_eq!(ranked[1].crop_name, "Second");
    }

    #[test]
    fn test_reason_cites_weak_factor() {
        let field = conditions(28, SoilTexture::Sandy, 23, Season::Kharif);
        let result = score_crop(&crop("Rabi Crop", 28, vec![SoilTexture::Loam]), &field);
        assert!(result.reason.contains("soil moisture 28%"));
        assert!(result.reason.contains("out of season"));
    }

    #[test]
    fn test_wheat_ranks_high_for_rabi_loam() {
        let field = conditions(28, SoilTexture::Loam, 18, Season::Rabi);
        let ranked = rank_crops(&default_catalog(), &field, 3);
        let wheat = find_default_crop("Wheat").unwrap();
        assert!(ranked.iter().any(|r| r.crop_name == wheat.name));
    }
}
