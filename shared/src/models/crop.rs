//! Crop parameter models and the built-in Uttar Pradesh crop catalog

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AgronomyError, AgronomyResult};
use crate::models::soil::SoilTexture;
use crate::validation::{validate_mad, validate_stage_thresholds, validate_vwc_band};

/// Cropping season a crop is sown in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    /// Monsoon season, June to October
    Kharif,
    /// Winter season, November to March
    Rabi,
    /// Short summer season, April to May
    Zaid,
    /// Grown year-round (e.g. sugarcane)
    Perennial,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "KHARIF",
            Season::Rabi => "RABI",
            Season::Zaid => "ZAID",
            Season::Perennial => "PERENNIAL",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Season {
    type Err = AgronomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KHARIF" => Ok(Season::Kharif),
            "RABI" => Ok(Season::Rabi),
            "ZAID" => Ok(Season::Zaid),
            "PERENNIAL" => Ok(Season::Perennial),
            _ => Err(AgronomyError::UnknownSeason(s.to_string())),
        }
    }
}

/// Stage boundaries as cumulative percent of the crop's total GDD
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StageThresholds {
    pub initial_end: Decimal,
    pub development_end: Decimal,
    pub mid_season_end: Decimal,
    pub late_season_end: Decimal,
}

impl StageThresholds {
    pub fn new(initial_end: i64, development_end: i64, mid_season_end: i64, late_season_end: i64) -> Self {
        Self {
            initial_end: Decimal::from(initial_end),
            development_end: Decimal::from(development_end),
            mid_season_end: Decimal::from(mid_season_end),
            late_season_end: Decimal::from(late_season_end),
        }
    }
}

/// Agronomic parameters for one crop in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropParameters {
    pub name: String,
    /// Base temperature for thermal time, °C
    pub base_temperature: Decimal,
    /// Growing degree days from sowing to maturity
    pub total_gdd: Decimal,
    pub vwc_min: Decimal,
    pub vwc_optimal: Decimal,
    pub vwc_max: Decimal,
    pub root_depth_cm: Decimal,
    /// Management allowable depletion, fraction of TAW (0-1)
    pub mad: Decimal,
    pub stage_thresholds: StageThresholds,
    pub preferred_textures: Vec<SoilTexture>,
    pub season: Season,
    /// Whether the crop is valid for the Uttar Pradesh agro-climatic zones
    pub up_region_valid: bool,
}

impl CropParameters {
    /// Check internal consistency of the parameters
    pub fn validate(&self) -> AgronomyResult<()> {
        let invalid = |msg: &str| AgronomyError::InvalidParameters(format!("{}: {}", self.name, msg));

        validate_vwc_band(self).map_err(invalid)?;
        if validate_mad(self.mad).is_err() {
            return Err(AgronomyError::OutOfRange {
                field: "mad".to_string(),
                value: self.mad,
            });
        }
        if self.root_depth_cm <= Decimal::ZERO {
            return Err(AgronomyError::OutOfRange {
                field: "root_depth_cm".to_string(),
                value: self.root_depth_cm,
            });
        }
        if self.total_gdd <= Decimal::ZERO {
            return Err(AgronomyError::OutOfRange {
                field: "total_gdd".to_string(),
                value: self.total_gdd,
            });
        }
        validate_stage_thresholds(&self.stage_thresholds).map_err(invalid)
    }

    pub fn prefers(&self, texture: SoilTexture) -> bool {
        self.preferred_textures.contains(&texture)
    }
}

struct CatalogEntry {
    name: &'static str,
    base: i64,
    total_gdd: i64,
    vwc: (i64, i64, i64),
    root_depth_cm: i64,
    mad_hundredths: i64,
    stages: (i64, i64, i64, i64),
    textures: &'static [SoilTexture],
    season: Season,
    up_region_valid: bool,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Wheat",
        base: 5,
        total_gdd: 1650,
        vwc: (22, 28, 34),
        root_depth_cm: 100,
        mad_hundredths: 55,
        stages: (15, 40, 75, 100),
        textures: &[SoilTexture::Loam, SoilTexture::ClayLoam, SoilTexture::SandyLoam],
        season: Season::Rabi,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Rice",
        base: 10,
        total_gdd: 1800,
        vwc: (35, 42, 50),
        root_depth_cm: 30,
        mad_hundredths: 20,
        stages: (20, 45, 80, 100),
        textures: &[SoilTexture::Clay, SoilTexture::ClayLoam],
        season: Season::Kharif,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Sugarcane",
        base: 12,
        total_gdd: 5000,
        vwc: (25, 32, 40),
        root_depth_cm: 120,
        mad_hundredths: 65,
        stages: (10, 35, 80, 100),
        textures: &[SoilTexture::Loam, SoilTexture::ClayLoam, SoilTexture::SandyLoam],
        season: Season::Perennial,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Mustard",
        base: 5,
        total_gdd: 1400,
        vwc: (18, 24, 30),
        root_depth_cm: 90,
        mad_hundredths: 60,
        stages: (15, 40, 75, 100),
        textures: &[SoilTexture::SandyLoam, SoilTexture::Loam],
        season: Season::Rabi,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Potato",
        base: 7,
        total_gdd: 1200,
        vwc: (24, 30, 36),
        root_depth_cm: 40,
        mad_hundredths: 35,
        stages: (20, 45, 80, 100),
        textures: &[SoilTexture::SandyLoam, SoilTexture::Loam],
        season: Season::Rabi,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Maize",
        base: 10,
        total_gdd: 1500,
        vwc: (22, 28, 34),
        root_depth_cm: 80,
        mad_hundredths: 55,
        stages: (15, 40, 75, 100),
        textures: &[SoilTexture::Loam, SoilTexture::SandyLoam, SoilTexture::ClayLoam],
        season: Season::Kharif,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Chickpea",
        base: 5,
        total_gdd: 1300,
        vwc: (18, 24, 30),
        root_depth_cm: 60,
        mad_hundredths: 50,
        stages: (15, 40, 75, 100),
        textures: &[SoilTexture::Loam, SoilTexture::ClayLoam],
        season: Season::Rabi,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Moong",
        base: 10,
        total_gdd: 1100,
        vwc: (20, 26, 32),
        root_depth_cm: 50,
        mad_hundredths: 50,
        stages: (15, 40, 75, 100),
        textures: &[SoilTexture::SandyLoam, SoilTexture::Loam],
        season: Season::Zaid,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Pigeon Pea",
        base: 10,
        total_gdd: 2500,
        vwc: (20, 26, 32),
        root_depth_cm: 90,
        mad_hundredths: 60,
        stages: (15, 40, 75, 100),
        textures: &[SoilTexture::Loam, SoilTexture::ClayLoam, SoilTexture::SandyLoam],
        season: Season::Kharif,
        up_region_valid: true,
    },
    CatalogEntry {
        name: "Tea",
        base: 13,
        total_gdd: 3000,
        vwc: (28, 34, 40),
        root_depth_cm: 60,
        mad_hundredths: 40,
        stages: (10, 30, 80, 100),
        textures: &[SoilTexture::SandyLoam, SoilTexture::Loam],
        season: Season::Perennial,
        up_region_valid: false,
    },
];

/// The built-in crop catalog, in catalog order.
///
/// Used to seed the crop catalog table and by the offline toolkit.
pub fn default_catalog() -> Vec<CropParameters> {
    CATALOG
        .iter()
        .map(|entry| CropParameters {
            name: entry.name.to_string(),
            base_temperature: Decimal::from(entry.base),
            total_gdd: Decimal::from(entry.total_gdd),
            vwc_min: Decimal::from(entry.vwc.0),
            vwc_optimal: Decimal::from(entry.vwc.1),
            vwc_max: Decimal::from(entry.vwc.2),
            root_depth_cm: Decimal::from(entry.root_depth_cm),
            mad: Decimal::new(entry.mad_hundredths, 2),
            stage_thresholds: StageThresholds::new(
                entry.stages.0,
                entry.stages.1,
                entry.stages.2,
                entry.stages.3,
            ),
            preferred_textures: entry.textures.to_vec(),
            season: entry.season,
            up_region_valid: entry.up_region_valid,
        })
        .collect()
}

/// Look up a built-in crop by name (case-insensitive)
pub fn find_default_crop(name: &str) -> AgronomyResult<CropParameters> {
    default_catalog()
        .into_iter()
        .find(|crop| crop.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| AgronomyError::UnknownCrop(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_consistent() {
        for crop in default_catalog() {
            assert!(crop.validate().is_ok(), "{} failed validation", crop.name);
        }
    }

    #[test]
    fn test_find_default_crop_case_insensitive() {
        let wheat = find_default_crop("wheat").unwrap();
        assert_eq!(wheat.name, "Wheat");
        assert_eq!(wheat.mad, Decimal::new(55, 2));
    }

    #[test]
    fn test_find_unknown_crop() {
        assert_eq!(
            find_default_crop("quinoa").unwrap_err(),
            AgronomyError::UnknownCrop("quinoa".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let mut crop = find_default_crop("Maize").unwrap();
        crop.vwc_optimal = Decimal::from(40);
        assert!(crop.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_single_value_band() {
        let mut crop = find_default_crop("Maize").unwrap();
        crop.vwc_min = crop.vwc_optimal;
        crop.vwc_max = crop.vwc_optimal;
        assert!(matches!(crop.validate(), Err(AgronomyError::InvalidParameters(_))));
    }

    #[test]
    fn test_validate_rejects_mad_above_one() {
        let mut crop = find_default_crop("Maize").unwrap();
        crop.mad = Decimal::new(15, 1);
        assert!(matches!(crop.validate(), Err(AgronomyError::OutOfRange { .. })));
    }

    #[test]
    fn test_validate_rejects_unordered_stages() {
        let mut crop = find_default_crop("Maize").unwrap();
        crop.stage_thresholds = StageThresholds::new(40, 30, 75, 100);
        assert!(crop.validate().is_err());
    }

    #[test]
    fn test_season_parse() {
        assert_eq!("rabi".parse::<Season>().unwrap(), Season::Rabi);
        assert!("monsoon".parse::<Season>().is_err());
    }
}
