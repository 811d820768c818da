//! FAO-56 style root-zone soil water balance

use rust_decimal::Decimal;

use crate::error::{AgronomyError, AgronomyResult};
use crate::models::{SoilTexture, WaterBalance};
use crate::types::round_half_up;

/// Depth of water (mm) held at `vwc_percent` over `root_depth_cm` of soil
pub fn water_depth_mm(vwc_percent: Decimal, root_depth_cm: Decimal) -> Decimal {
    vwc_percent / Decimal::ONE_HUNDRED * root_depth_cm * Decimal::TEN
}

/// Compute TAW, RAW, current water depth and depletion for a root zone.
///
/// All outputs are rounded to 1 decimal. Depletion is measured from field
/// capacity and never negative, so a soil wetter than FC reports 0%.
pub fn calculate_water_balance(
    texture: SoilTexture,
    current_vwc: Decimal,
    root_depth_cm: Decimal,
    mad: Decimal,
) -> AgronomyResult<WaterBalance> {
    if root_depth_cm <= Decimal::ZERO {
        return Err(AgronomyError::OutOfRange {
            field: "root_depth_cm".to_string(),
            value: root_depth_cm,
        });
    }
    if mad < Decimal::ZERO || mad > Decimal::ONE {
        return Err(AgronomyError::OutOfRange {
            field: "mad".to_string(),
            value: mad,
        });
    }

    let props = texture.properties();
    let taw = water_depth_mm(props.field_capacity - props.wilting_point, root_depth_cm);
    let raw = taw * (Decimal::ONE - mad);
    let current_depth = water_depth_mm(current_vwc, root_depth_cm);
    let fc_depth = water_depth_mm(props.field_capacity, root_depth_cm);
    let depletion = ((fc_depth - current_depth) / taw * Decimal::ONE_HUNDRED).max(Decimal::ZERO);

    Ok(WaterBalance {
        taw_mm: round_half_up(taw, 1),
        raw_mm: round_half_up(raw, 1),
        current_depth_mm: round_half_up(current_depth, 1),
        depletion_percent: round_half_up(depletion, 1),
    })
}

/// Water balance for a texture name read from storage
pub fn calculate_water_balance_for_texture_name(
    texture: &str,
    current_vwc: Decimal,
    root_depth_cm: Decimal,
    mad: Decimal,
) -> AgronomyResult<WaterBalance> {
    calculate_water_balance(texture.parse()?, current_vwc, root_depth_cm, mad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sandy_loam_reference_values() {
        // FC 18, WP 8, 40 cm roots, MAD 0.5
        let wb = calculate_water_balance(SoilTexture::SandyLoam, dec("13"), dec("40"), dec("0.5"))
            .unwrap();
        assert_eq!(wb.taw_mm, dec("40.0"));
        assert_eq!(wb.raw_mm, dec("20.0"));
        assert_eq!(wb.current_depth_mm, dec("52.0"));
        // (72 - 52) / 40
        assert_eq!(wb.depletion_percent, dec("50.0"));
    }

    #[test]
    fn test_zero_depletion_at_field_capacity() {
        for texture in SoilTexture::ALL {
            let fc = texture.properties().field_capacity;
            let wb = calculate_water_balance(texture, fc, dec("60"), dec("0.5")).unwrap();
            assert_eq!(wb.depletion_percent, Decimal::ZERO, "{}", texture);
        }
    }

    #[test]
    fn test_depletion_floor_when_wetter_than_fc() {
        let wb = calculate_water_balance(SoilTexture::SandyLoam, dec("35"), dec("40"), dec("0.5"))
            .unwrap();
        assert_eq!(wb.depletion_percent, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(calculate_water_balance(SoilTexture::Loam, dec("20"), Decimal::ZERO, dec("0.5")).is_err());
        assert!(calculate_water_balance(SoilTexture::Loam, dec("20"), dec("30"), dec("1.5")).is_err());
    }

    #[test]
    fn test_unknown_texture_name_rejected() {
        let result = calculate_water_balance_for_texture_name("GRAVEL", dec("20"), dec("30"), dec("0.5"));
        assert!(matches!(result, Err(AgronomyError::UnknownSoilTexture(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// RAW never exceeds TAW and depletion is never negative
        #[test]
        fn prop_raw_le_taw_and_depletion_non_negative(
            texture_idx in 0usize..5,
            vwc_tenths in 0i64..=1000,
            root_cm in 10i64..=200,
            mad_hundredths in 0i64..=100
        ) {
            let wb = calculate_water_balance(
                SoilTexture::ALL[texture_idx],
                Decimal::new(vwc_tenths, 1),
                Decimal::from(root_cm),
                Decimal::new(mad_hundredths, 2),
            ).unwrap();
            prop_assert!(wb.raw_mm <= wb.taw_mm);
            prop_assert!(wb.depletion_percent >= Decimal::ZERO);
        }
    }
}
