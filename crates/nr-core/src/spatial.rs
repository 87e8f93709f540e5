//! Query window math around a coordinate.

use crate::models::Coordinate;
use serde::Serialize;
use std::f64::consts::PI;

/// Mean Earth radius used for the degree offsets.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default radius of the feature search window.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 2.0;

/// Rectangular lat/lon window centred on a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Window of `radius_km` around `center`.
    ///
    /// The longitude half-width is the latitude half-width divided by
    /// `cos(latitude)`, so it grows without bound towards the poles. Use
    /// [`BoundingBox::clamp_to_world`] before sending the box to a service.
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let lat_offset = lat_offset_deg(radius_km);
        let lon_offset = lon_offset_deg(radius_km, center.latitude());
        Self {
            min_lat: center.latitude() - lat_offset,
            max_lat: center.latitude() + lat_offset,
            min_lon: center.longitude() - lon_offset,
            max_lon: center.longitude() + lon_offset,
        }
    }

    pub fn lat_half_width(&self) -> f64 {
        (self.max_lat - self.min_lat) / 2.0
    }

    pub fn lon_half_width(&self) -> f64 {
        (self.max_lon - self.min_lon) / 2.0
    }

    /// True when the box already fits inside the valid coordinate range.
    pub fn is_within_world(&self) -> bool {
        self.min_lat >= -90.0
            && self.max_lat <= 90.0
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0
    }

    /// Box fitted to the valid coordinate range. Latitudes are clamped.
    /// Longitudes past ±180 wrap around, leaving `min_lon > max_lon` for a
    /// window that crosses the antimeridian. Near the poles the window
    /// collapses to the full longitude span instead of diverging.
    pub fn clamp_to_world(&self) -> Self {
        let lon_span = self.max_lon - self.min_lon;
        let (min_lon, max_lon) = if lon_span.is_finite() && lon_span < 360.0 {
            (wrap_lon(self.min_lon), wrap_lon(self.max_lon))
        } else {
            (-180.0, 180.0)
        };
        Self {
            min_lat: self.min_lat.max(-90.0),
            max_lat: self.max_lat.min(90.0),
            min_lon,
            max_lon,
        }
    }

    /// True for a wrapped window whose west edge lies east of its east edge.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Overpass bbox filter order: south, west, north, east.
    pub fn to_overpass_filter(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

fn wrap_lon(value: f64) -> f64 {
    if (-180.0..=180.0).contains(&value) {
        value
    } else {
        (value + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Latitude half-width in degrees for a radius in km.
pub fn lat_offset_deg(radius_km: f64) -> f64 {
    (radius_km / EARTH_RADIUS_KM) * (180.0 / PI)
}

/// Longitude half-width in degrees at `latitude_deg`.
pub fn lon_offset_deg(radius_km: f64, latitude_deg: f64) -> f64 {
    lat_offset_deg(radius_km) / latitude_deg.to_radians().cos()
}
