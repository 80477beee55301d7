//! Resolved places and how close to zoom on them.

use serde::{Deserialize, Serialize};

/// A place returned by the location resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
    /// Coarse class such as `city`, `building`, `poi` or `place`.
    pub location_type: String,
    /// `[south, north, west, east]` when the resolver reports one.
    #[serde(default)]
    pub bounding_box: Option<[f64; 4]>,
}

impl ResolvedLocation {
    /// Position as `[lon, lat]`.
    pub fn point(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn zoom_level(&self) -> u8 {
        zoom_for_location_type(&self.location_type)
    }
}

/// Map zoom appropriate for a location type; 15 when unknown.
pub fn zoom_for_location_type(location_type: &str) -> u8 {
    match location_type {
        "city" | "administrative" => 12,
        "town" => 13,
        "village" => 14,
        "neighbourhood" => 15,
        "building" => 17,
        "landmark" | "amenity" => 16,
        "house" => 18,
        _ => 15,
    }
}
