//! Geographic query rectangles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest span (degrees) allowed on either axis of a spatial query, roughly 1 km.
pub const MAX_SPAN_DEG: f64 = 0.01;
/// Kilometers per degree of latitude.
pub const KM_PER_DEG_LAT: f64 = 111.0;

/// Divisor used in place of `111·cos(lat)` when the cosine vanishes at the poles.
const POLAR_KM_PER_DEG_LON: f64 = 1.0e9;
const MIN_HALF_SPAN_DEG: f64 = 1.0e-7;
/// Trimmed off each side of a clamped box so rounding never lifts its span
/// over the cap.
const CLAMP_MARGIN_DEG: f64 = 1.0e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("bounding box has non-finite coordinates")]
    NonFinite,
    #[error("bounding box south ({south}) must be below north ({north})")]
    InvertedLatitude { south: f64, north: f64 },
    #[error("bounding box west ({west}) must be below east ({east})")]
    InvertedLongitude { west: f64, east: f64 },
}

/// Rectangle in degrees. Valid boxes satisfy `south < north` and `west < east`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, GeoError> {
        let bbox = Self {
            south,
            west,
            north,
            east,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Box of `radius_km` around `center` (`[lon, lat]`).
    ///
    /// Uses 111 km per degree of latitude and `111·cos(lat)` km per degree of
    /// longitude. Near the poles the longitude span collapses instead of
    /// dividing by zero.
    pub fn expand_from_center(center: [f64; 2], radius_km: f64) -> Self {
        let [lon, lat] = center;
        let lat_offset = (radius_km / KM_PER_DEG_LAT).max(MIN_HALF_SPAN_DEG);

        let km_per_deg_lon = (KM_PER_DEG_LAT * lat.to_radians().cos()).abs();
        let km_per_deg_lon = if km_per_deg_lon < 1.0e-9 {
            POLAR_KM_PER_DEG_LON
        } else {
            km_per_deg_lon
        };
        let lon_offset = (radius_km / km_per_deg_lon).max(MIN_HALF_SPAN_DEG);

        Self {
            south: lat - lat_offset,
            west: lon - lon_offset,
            north: lat + lat_offset,
            east: lon + lon_offset,
        }
    }

    /// Recenters a square just inside `MAX_SPAN_DEG` on the centroid when
    /// either span is over the cap. Boxes already within the cap are returned
    /// unchanged.
    pub fn clamp(&self) -> Self {
        if self.lat_span() <= MAX_SPAN_DEG && self.lon_span() <= MAX_SPAN_DEG {
            return *self;
        }

        let [lon, lat] = self.center();
        let half = MAX_SPAN_DEG / 2.0 - CLAMP_MARGIN_DEG;
        Self {
            south: lat - half,
            west: lon - half,
            north: lat + half,
            east: lon + half,
        }
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        if ![self.south, self.west, self.north, self.east]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(GeoError::NonFinite);
        }
        if self.south >= self.north {
            return Err(GeoError::InvertedLatitude {
                south: self.south,
                north: self.north,
            });
        }
        if self.west >= self.east {
            return Err(GeoError::InvertedLongitude {
                west: self.west,
                east: self.east,
            });
        }
        Ok(())
    }

    /// Midpoint as `[lon, lat]`.
    pub fn center(&self) -> [f64; 2] {
        [
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        ]
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Overpass filter order: `south,west,north,east`.
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}
