//! Soil texture models and per-texture hydraulic constants

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AgronomyError;

/// Lowest raw count the moisture sensor ADC reports
pub const RAW_MOISTURE_MIN: i32 = 0;
/// Highest raw count the moisture sensor ADC reports (10-bit)
pub const RAW_MOISTURE_MAX: i32 = 1023;

/// Soil textures supported by the calibration tables
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoilTexture {
    Sandy,
    SandyLoam,
    Loam,
    ClayLoam,
    Clay,
}

/// One breakpoint of a sensor calibration curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalibrationPoint {
    pub raw_count: i32,
    pub vwc_percent: Decimal,
}

/// Hydraulic constants and calibration curve for a soil texture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilProperties {
    /// Field capacity, VWC %
    pub field_capacity: Decimal,
    /// Permanent wilting point, VWC %
    pub wilting_point: Decimal,
    /// Saturation, VWC %
    pub saturation: Decimal,
    /// Breakpoints ordered by ascending raw count
    pub calibration_curve: Vec<CalibrationPoint>,
}

fn curve(points: &[(i32, i64)]) -> Vec<CalibrationPoint> {
    points
        .iter()
        .map(|&(raw_count, vwc_tenths)| CalibrationPoint {
            raw_count,
            vwc_percent: Decimal::new(vwc_tenths, 1),
        })
        .collect()
}

impl SoilTexture {
    pub const ALL: [SoilTexture; 5] = [
        SoilTexture::Sandy,
        SoilTexture::SandyLoam,
        SoilTexture::Loam,
        SoilTexture::ClayLoam,
        SoilTexture::Clay,
    ];

    /// Hydraulic constants and sensor calibration for this texture.
    ///
    /// Curves are ordered by raw count, non-decreasing in VWC, and span the
    /// full ADC range.
    pub fn properties(&self) -> SoilProperties {
        match self {
            SoilTexture::Sandy => SoilProperties {
                field_capacity: Decimal::new(100, 1),
                wilting_point: Decimal::new(40, 1),
                saturation: Decimal::new(380, 1),
                calibration_curve: curve(&[
                    (0, 0),
                    (200, 30),
                    (400, 80),
                    (600, 150),
                    (800, 250),
                    (1023, 380),
                ]),
            },
            SoilTexture::SandyLoam => SoilProperties {
                field_capacity: Decimal::new(180, 1),
                wilting_point: Decimal::new(80, 1),
                saturation: Decimal::new(410, 1),
                calibration_curve: curve(&[
                    (0, 0),
                    (150, 40),
                    (350, 100),
                    (550, 180),
                    (750, 280),
                    (900, 360),
                    (1023, 410),
                ]),
            },
            SoilTexture::Loam => SoilProperties {
                field_capacity: Decimal::new(270, 1),
                wilting_point: Decimal::new(120, 1),
                saturation: Decimal::new(430, 1),
                calibration_curve: curve(&[
                    (0, 0),
                    (150, 60),
                    (350, 140),
                    (550, 240),
                    (750, 330),
                    (1023, 430),
                ]),
            },
            SoilTexture::ClayLoam => SoilProperties {
                field_capacity: Decimal::new(340, 1),
                wilting_point: Decimal::new(170, 1),
                saturation: Decimal::new(470, 1),
                calibration_curve: curve(&[
                    (0, 0),
                    (120, 80),
                    (300, 170),
                    (500, 260),
                    (700, 350),
                    (1023, 470),
                ]),
            },
            SoilTexture::Clay => SoilProperties {
                field_capacity: Decimal::new(400, 1),
                wilting_point: Decimal::new(240, 1),
                saturation: Decimal::new(500, 1),
                calibration_curve: curve(&[
                    (0, 0),
                    (100, 100),
                    (300, 240),
                    (500, 320),
                    (700, 400),
                    (1023, 500),
                ]),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilTexture::Sandy => "SANDY",
            SoilTexture::SandyLoam => "SANDY_LOAM",
            SoilTexture::Loam => "LOAM",
            SoilTexture::ClayLoam => "CLAY_LOAM",
            SoilTexture::Clay => "CLAY",
        }
    }

    /// Human-readable name used in recommendation text
    pub fn label(&self) -> &'static str {
        match self {
            SoilTexture::Sandy => "sandy",
            SoilTexture::SandyLoam => "sandy loam",
            SoilTexture::Loam => "loam",
            SoilTexture::ClayLoam => "clay loam",
            SoilTexture::Clay => "clay",
        }
    }
}

impl std::fmt::Display for SoilTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SoilTexture {
    type Err = AgronomyError;

    /// Accepts `SANDY_LOAM`, `sandy_loam`, `sandy loam` and `sandy-loam`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "SANDY" => Ok(SoilTexture::Sandy),
            "SANDY_LOAM" => Ok(SoilTexture::SandyLoam),
            "LOAM" => Ok(SoilTexture::Loam),
            "CLAY_LOAM" => Ok(SoilTexture::ClayLoam),
            "CLAY" => Ok(SoilTexture::Clay),
            _ => Err(AgronomyError::UnknownSoilTexture(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_texture_variants() {
        assert_eq!("SANDY_LOAM".parse::<SoilTexture>().unwrap(), SoilTexture::SandyLoam);
        assert_eq!("clay loam".parse::<SoilTexture>().unwrap(), SoilTexture::ClayLoam);
        assert_eq!("sandy-loam".parse::<SoilTexture>().unwrap(), SoilTexture::SandyLoam);
    }

    #[test]
    fn test_parse_unknown_texture_fails() {
        let err = "SILT".parse::<SoilTexture>().unwrap_err();
        assert_eq!(err, AgronomyError::UnknownSoilTexture("SILT".to_string()));
    }

    #[test]
    fn test_properties_are_physically_ordered() {
        for texture in SoilTexture::ALL {
            let props = texture.properties();
            assert!(props.wilting_point < props.field_capacity, "{}", texture);
            assert!(props.field_capacity < props.saturation, "{}", texture);
        }
    }

    #[test]
    fn test_curves_are_ordered_and_span_adc_range() {
        for texture in SoilTexture::ALL {
            let points = texture.properties().calibration_curve;
            assert_eq!(points.first().unwrap().raw_count, RAW_MOISTURE_MIN);
            assert_eq!(points.last().unwrap().raw_count, RAW_MOISTURE_MAX);
            for pair in points.windows(2) {
                assert!(pair[0].raw_count < pair[1].raw_count, "{}", texture);
                assert!(pair[0].vwc_percent <= pair[1].vwc_percent, "{}", texture);
            }
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for texture in SoilTexture::ALL {
            assert_eq!(texture.to_string().parse::<SoilTexture>().unwrap(), texture);
        }
    }
}
