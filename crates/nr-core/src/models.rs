//! Core data models for the NR configuration advisor.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Land-use value reported when no area tag could be resolved.
pub const UNKNOWN_LAND_TYPE: &str = "Unknown";

/// A validated WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        // NaN fails both range checks.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Signals gathered around a coordinate. Every field is sourced and
/// defaulted independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Number of `building` ways inside the search window.
    pub building_density: u64,
    /// `landuse` tag of the enclosing area, or [`UNKNOWN_LAND_TYPE`].
    pub land_type: String,
    pub mountains_nearby: bool,
    pub elevation_m: f64,
    /// Mean `maxspeed` of major roads in km/h (see `nr_geodata::parse`).
    pub avg_road_speed: f64,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self {
            building_density: 0,
            land_type: UNKNOWN_LAND_TYPE.to_string(),
            mountains_nearby: false,
            elevation_m: 0.0,
            avg_road_speed: 0.0,
        }
    }
}

/// One of the five independent feature sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    RoadSpeed,
    BuildingDensity,
    LandType,
    Mountains,
    Elevation,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 5] = [
        FeatureKind::RoadSpeed,
        FeatureKind::BuildingDensity,
        FeatureKind::LandType,
        FeatureKind::Mountains,
        FeatureKind::Elevation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RoadSpeed => "road_speed",
            Self::BuildingDensity => "building_density",
            Self::LandType => "land_type",
            Self::Mountains => "mountains",
            Self::Elevation => "elevation",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records that a feature holds its default value because its fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFallback {
    pub feature: FeatureKind,
    pub reason: String,
}

/// Output of one collection pass: the joined features plus which of them
/// were substituted by defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectedFeatures {
    pub features: FeatureSet,
    pub fallbacks: Vec<FeatureFallback>,
}

impl CollectedFeatures {
    pub fn is_defaulted(&self, feature: FeatureKind) -> bool {
        self.fallbacks.iter().any(|f| f.feature == feature)
    }

    pub fn is_complete(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyBand {
    #[serde(rename = "700 MHz")]
    Mhz700,
    #[serde(rename = "3.5 GHz")]
    Ghz3_5,
    #[serde(rename = "26 GHz")]
    Ghz26,
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mhz700 => "700 MHz",
            Self::Ghz3_5 => "3.5 GHz",
            Self::Ghz26 => "26 GHz",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubcarrierSpacing {
    #[serde(rename = "15 kHz")]
    Khz15,
    #[serde(rename = "30 kHz")]
    Khz30,
    #[serde(rename = "120 kHz")]
    Khz120,
}

impl fmt::Display for SubcarrierSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Khz15 => "15 kHz",
            Self::Khz30 => "30 kHz",
            Self::Khz120 => "120 kHz",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclicPrefixMode {
    Normal,
    Extended,
}

impl fmt::Display for CyclicPrefixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "Normal",
            Self::Extended => "Extended",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputPower {
    Low,
    Medium,
    High,
}

impl fmt::Display for OutputPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// Recommended radio configuration for a site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AntennaConfig {
    pub frequency_band: FrequencyBand,
    pub subcarrier_spacing: SubcarrierSpacing,
    pub cyclic_prefix_mode: CyclicPrefixMode,
    pub output_power: OutputPower,
    pub coverage_radius_km: f64,
}

impl fmt::Display for AntennaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} CP / {} power / {} km",
            self.frequency_band,
            self.subcarrier_spacing,
            self.cyclic_prefix_mode,
            self.output_power,
            self.coverage_radius_km
        )
    }
}
