//! Conversion of raw sensor counts to engineering units

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AgronomyError, AgronomyResult};
use crate::models::{SoilTexture, RAW_MOISTURE_MAX, RAW_MOISTURE_MIN};
use crate::types::{clamp_decimal, round_half_up};

/// Lowest soil temperature the sensor can report, °C
pub const SOIL_TEMP_MIN_C: i64 = -40;
/// Highest soil temperature the sensor can report, °C
pub const SOIL_TEMP_MAX_C: i64 = 85;

/// Valid raw count window of the moisture sensor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorRange {
    pub raw_min: i32,
    pub raw_max: i32,
}

impl Default for SensorRange {
    fn default() -> Self {
        Self {
            raw_min: RAW_MOISTURE_MIN,
            raw_max: RAW_MOISTURE_MAX,
        }
    }
}

impl SensorRange {
    pub fn clamp(&self, raw_count: i32) -> i32 {
        raw_count.clamp(self.raw_min, self.raw_max)
    }
}

/// Calibrated values for one reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalibratedValues {
    pub vwc_percent: Decimal,
    pub soil_temperature_celsius: Decimal,
}

/// Convert a raw moisture count to VWC % using the default sensor range
pub fn to_vwc(raw_count: i32, texture: SoilTexture) -> Decimal {
    to_vwc_within(raw_count, texture, SensorRange::default())
}

/// Convert a raw moisture count to VWC %.
///
/// The count is clamped to `range`, then linearly interpolated between the
/// two breakpoints of the texture's calibration curve that bracket it.
/// Result is rounded to 2 decimals and always lies in [0, 100].
pub fn to_vwc_within(raw_count: i32, texture: SoilTexture, range: SensorRange) -> Decimal {
    let raw = range.clamp(raw_count);
    let curve = texture.properties().calibration_curve;

    let vwc = match (curve.first(), curve.last()) {
        (Some(first), _) if raw <= first.raw_count => first.vwc_percent,
        (_, Some(last)) if raw >= last.raw_count => last.vwc_percent,
        _ => curve
            .windows(2)
            .find(|pair| raw >= pair[0].raw_count && raw <= pair[1].raw_count)
            .map(|pair| {
                let (lo, hi) = (pair[0], pair[1]);
                let offset = Decimal::from(raw - lo.raw_count);
                let span = Decimal::from(hi.raw_count - lo.raw_count);
                lo.vwc_percent + offset * (hi.vwc_percent - lo.vwc_percent) / span
            })
            .unwrap_or(Decimal::ZERO),
    };

    clamp_decimal(round_half_up(vwc, 2), Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Convert a raw moisture count using a texture name from storage or an
/// inbound payload. Unknown textures are rejected, never defaulted.
pub fn to_vwc_for_texture_name(raw_count: i32, texture: &str) -> AgronomyResult<Decimal> {
    let texture: SoilTexture = texture.parse()?;
    Ok(to_vwc(raw_count, texture))
}

/// Convert the sensor's temperature (°C × 10) to °C, rounded to 2 decimals
pub fn to_temperature(raw_temp_times_ten: i32) -> Decimal {
    round_half_up(Decimal::from(raw_temp_times_ten) / Decimal::TEN, 2)
}

/// Reject soil temperatures outside the sensor's physical range
pub fn validate_soil_temperature(celsius: Decimal) -> AgronomyResult<()> {
    if celsius < Decimal::from(SOIL_TEMP_MIN_C) || celsius > Decimal::from(SOIL_TEMP_MAX_C) {
        return Err(AgronomyError::OutOfRange {
            field: "soil_temperature_celsius".to_string(),
            value: celsius,
        });
    }
    Ok(())
}

/// Calibrate both channels of a raw reading
pub fn calibrate(
    raw_moisture: i32,
    raw_temperature: i32,
    texture: SoilTexture,
    range: SensorRange,
) -> AgronomyResult<CalibratedValues> {
    let soil_temperature_celsius = to_temperature(raw_temperature);
    validate_soil_temperature(soil_temperature_celsius)?;

    Ok(CalibratedValues {
        vwc_percent: to_vwc_within(raw_moisture, texture, range),
        soil_temperature_celsius,
    })
}
