//! Core data models shared by the router, the HTTP API and the SDK.

use crate::bbox::{BoundingBox, GeoError};
use crate::intent::{Action, CameraSettings, Intent, TimeSettings, WeatherSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form source tags (`name`, `height`, `building:levels`, ...).
pub type TagMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    Feature,
}

/// GeoJSON geometry. Coordinates are `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

/// A building footprint serialized as a GeoJSON Feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingFeature {
    #[serde(rename = "type", default)]
    pub kind: FeatureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: TagMap,
}

impl BuildingFeature {
    pub fn polygon(id: Option<i64>, ring: Vec<[f64; 2]>, properties: TagMap) -> Self {
        Self {
            kind: FeatureKind::Feature,
            id,
            geometry: Geometry::Polygon {
                coordinates: vec![ring],
            },
            properties,
        }
    }

    /// Axis-aligned square of `half_width_deg` around `[lon, lat]`.
    pub fn square(id: Option<i64>, center: [f64; 2], half_width_deg: f64, properties: TagMap) -> Self {
        let [lon, lat] = center;
        let ring = vec![
            [lon - half_width_deg, lat - half_width_deg],
            [lon + half_width_deg, lat - half_width_deg],
            [lon + half_width_deg, lat + half_width_deg],
            [lon - half_width_deg, lat + half_width_deg],
            [lon - half_width_deg, lat - half_width_deg],
        ];
        Self::polygon(id, ring, properties)
    }

    /// Outer ring, empty when the geometry has none.
    pub fn ring(&self) -> &[[f64; 2]] {
        match &self.geometry {
            Geometry::Polygon { coordinates } => coordinates.first().map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// True for a closed outer ring with at least four vertices.
    pub fn is_closed_polygon(&self) -> bool {
        let ring = self.ring();
        ring.len() >= 4 && ring.first() == ring.last()
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.tag("name")
    }

    pub fn area_m2(&self) -> f64 {
        crate::metrics::area_m2(self)
    }

    pub fn estimated_height_m(&self) -> f64 {
        crate::metrics::estimated_height_m(self)
    }

    pub fn centroid(&self) -> Option<[f64; 2]> {
        crate::metrics::centroid(self)
    }
}

/// The uniform answer for every action.
///
/// `intent`, `action`, `answer`, `coordinates`, `target`, `candidates`,
/// `should_fly_to` and `zoom_level` are always serialized (nulls included);
/// action-specific fields only when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub intent: Intent,
    pub action: Action,
    pub answer: String,
    pub coordinates: Option<[f64; 2]>,
    pub target: Option<BuildingFeature>,
    pub candidates: Vec<BuildingFeature>,
    pub should_fly_to: bool,
    pub zoom_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_settings: Option<WeatherSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_settings: Option<TimeSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_settings: Option<CameraSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_target: Option<BuildingFeature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa_data: Option<TagMap>,
}

impl RouteResponse {
    /// Answer-only response: nothing to fly to, nothing highlighted.
    pub fn message(intent: Intent, action: Action, answer: impl Into<String>) -> Self {
        Self {
            intent,
            action,
            answer: answer.into(),
            coordinates: None,
            target: None,
            candidates: Vec::new(),
            should_fly_to: false,
            zoom_level: None,
            weather_settings: None,
            time_settings: None,
            camera_settings: None,
            delete_target: None,
            qa_data: None,
        }
    }

    /// Fly-to response for a resolved point.
    pub fn fly_to(
        intent: Intent,
        action: Action,
        answer: impl Into<String>,
        coordinates: [f64; 2],
        zoom_level: u8,
    ) -> Self {
        Self {
            coordinates: Some(coordinates),
            should_fly_to: true,
            zoom_level: Some(zoom_level),
            ..Self::message(intent, action, answer)
        }
    }
}

/// A search as submitted by the map client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Visible map area.
    #[serde(default, alias = "currentBounds", skip_serializing_if = "Option::is_none")]
    pub current_bounds: Option<BoundingBox>,
    /// Map center as `[lon, lat]`.
    #[serde(default, alias = "currentCenter", skip_serializing_if = "Option::is_none")]
    pub current_center: Option<[f64; 2]>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            current_bounds: None,
            current_center: None,
        }
    }

    /// Request with a viewport; the center is the box midpoint.
    pub fn with_viewport(query: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            query: query.into(),
            current_center: Some(bounds.center()),
            current_bounds: Some(bounds),
        }
    }

    /// Rejects an inverted or non-finite viewport.
    pub fn validate(&self) -> Result<(), GeoError> {
        if let Some(bounds) = &self.current_bounds {
            bounds.validate()?;
        }
        match self.current_center {
            Some([lon, lat]) if !lon.is_finite() || !lat.is_finite() => Err(GeoError::NonFinite),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feature_serializes_as_geojson() {
        let mut tags = TagMap::new();
        tags.insert("name".to_string(), "Hall".to_string());
        let feature = BuildingFeature::square(Some(7), [1.0, 2.0], 0.5, tags);

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["id"], 7);
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert_eq!(value["geometry"]["coordinates"][0][0], json!([0.5, 1.5]));
        assert_eq!(value["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
        assert_eq!(value["properties"]["name"], "Hall");
        assert!(feature.is_closed_polygon());
    }

    #[test]
    fn response_keeps_null_fields() {
        let response = RouteResponse::message(Intent::new(Action::SearchArea), Action::SearchArea, "hi");
        let value = serde_json::to_value(&response).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "intent",
            "action",
            "answer",
            "coordinates",
            "target",
            "candidates",
            "should_fly_to",
            "zoom_level",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert!(value["coordinates"].is_null());
        assert!(!object.contains_key("delete_target"));
    }

    #[test]
    fn blank_tags_are_treated_as_missing() {
        let mut tags = TagMap::new();
        tags.insert("name".to_string(), "  ".to_string());
        let feature = BuildingFeature::square(None, [0.0, 0.0], 0.001, tags);
        assert_eq!(feature.name(), None);
    }

    #[test]
    fn search_request_accepts_camel_case() {
        let request: SearchRequest = serde_json::from_value(json!({
            "query": "tallest building",
            "currentBounds": {"south": 43.64, "west": -79.39, "north": 43.65, "east": -79.38},
            "currentCenter": [-79.385, 43.645]
        }))
        .unwrap();
        assert_eq!(request.current_center, Some([-79.385, 43.645]));
        assert!(request.current_bounds.is_some());
        assert!(request.validate().is_ok());

        let snake: SearchRequest = serde_json::from_value(json!({
            "query": "q",
            "current_bounds": {"south": 1.0, "west": 1.0, "north": 0.0, "east": 2.0}
        }))
        .unwrap();
        assert!(matches!(snake.validate(), Err(GeoError::InvertedLatitude { .. })));
    }

    #[test]
    fn viewport_request_centers_on_box() {
        let bounds = BoundingBox::new(0.0, 10.0, 2.0, 14.0).unwrap();
        let request = SearchRequest::with_viewport("explore", bounds);
        assert_eq!(request.current_center, Some([12.0, 1.0]));
    }
}
