//! Structured classification of a natural-language map query.
//!
//! The wire shape matches what the remote intent parser is prompted to emit,
//! so the same types deserialize model output and describe keyword-parser
//! output.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// What the user asked the map to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Navigate,
    FindBuilding,
    #[default]
    SearchArea,
    SetWeather,
    SetTime,
    CameraControl,
    DeleteBuilding,
    Question,
    /// Anything the parser emitted that we do not recognize.
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::FindBuilding => "find_building",
            Self::SearchArea => "search_area",
            Self::SetWeather => "set_weather",
            Self::SetTime => "set_time",
            Self::CameraControl => "camera_control",
            Self::DeleteBuilding => "delete_building",
            Self::Question => "question",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranking criterion for building searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Height,
    Area,
    Underdeveloped,
    #[default]
    #[serde(rename = "none", other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingAttributes {
    #[serde(default)]
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub building_type: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Rain,
    Snow,
    #[default]
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSettings {
    #[serde(rename = "type", default)]
    pub kind: WeatherKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePreset {
    #[default]
    Day,
    Night,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSettings {
    #[serde(default)]
    pub preset: TimePreset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchChange {
    Increase,
    Decrease,
}

/// Camera pitch: absolute degrees (0 = straight down) or a relative nudge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pitch {
    Degrees(f64),
    Relative(PitchChange),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<Pitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing_delta: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionContext {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub target_name: Option<String>,
}

/// A classified user request. Produced once per query and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub location_query: Option<String>,
    #[serde(default)]
    pub building_attributes: Option<BuildingAttributes>,
    #[serde(default)]
    pub search_radius_km: Option<f64>,
    #[serde(default)]
    pub weather_settings: Option<WeatherSettings>,
    #[serde(default)]
    pub time_settings: Option<TimeSettings>,
    #[serde(default)]
    pub camera_settings: Option<CameraSettings>,
    #[serde(default)]
    pub question_context: Option<QuestionContext>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl Intent {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }

    /// Location text with surrounding whitespace removed; blank counts as absent.
    pub fn location(&self) -> Option<&str> {
        self.location_query
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn sort_by(&self) -> SortBy {
        self.building_attributes
            .as_ref()
            .and_then(|attrs| attrs.sort_by)
            .unwrap_or_default()
    }

    /// Requested result count, at least 1.
    pub fn limit(&self) -> usize {
        self.building_attributes
            .as_ref()
            .and_then(|attrs| attrs.limit)
            .unwrap_or(DEFAULT_RESULT_LIMIT)
            .max(1)
    }

    /// Search radius if the parser supplied a usable one, else `default_km`.
    pub fn search_radius_km_or(&self, default_km: f64) -> f64 {
        self.search_radius_km
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or(default_km)
    }

    pub fn target_name(&self) -> Option<&str> {
        self.question_context
            .as_ref()
            .and_then(|ctx| ctx.target_name.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_model_output() {
        let intent: Intent = serde_json::from_value(json!({
            "action": "find_building",
            "location_query": "Toronto",
            "building_attributes": {"sort_by": "height", "building_type": "any", "limit": 3},
            "search_radius_km": null,
            "weather_settings": null,
            "reasoning": "tallest in a city"
        }))
        .unwrap();

        assert_eq!(intent.action, Action::FindBuilding);
        assert_eq!(intent.location(), Some("Toronto"));
        assert_eq!(intent.sort_by(), SortBy::Height);
        assert_eq!(intent.limit(), 3);
    }

    #[test]
    fn unknown_values_fall_back() {
        let intent: Intent = serde_json::from_value(json!({
            "action": "launch_rocket",
            "building_attributes": {"sort_by": "null", "limit": 0}
        }))
        .unwrap();

        assert_eq!(intent.action, Action::Unknown);
        assert_eq!(intent.sort_by(), SortBy::Unspecified);
        assert_eq!(intent.limit(), 1);
    }

    #[test]
    fn missing_action_means_search_area() {
        let intent: Intent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(intent.action, Action::SearchArea);
        assert_eq!(intent.limit(), DEFAULT_RESULT_LIMIT);
    }

    #[test]
    fn camera_pitch_accepts_number_or_direction() {
        let camera: CameraSettings = serde_json::from_value(json!({"pitch": 0})).unwrap();
        assert_eq!(camera.pitch, Some(Pitch::Degrees(0.0)));

        let camera: CameraSettings =
            serde_json::from_value(json!({"pitch": "increase"})).unwrap();
        assert_eq!(camera.pitch, Some(Pitch::Relative(PitchChange::Increase)));
    }

    #[test]
    fn radius_ignores_non_positive_values() {
        let mut intent = Intent::new(Action::FindBuilding);
        intent.search_radius_km = Some(-1.0);
        assert_eq!(intent.search_radius_km_or(2.0), 2.0);
        intent.search_radius_km = Some(0.5);
        assert_eq!(intent.search_radius_km_or(2.0), 0.5);
    }

    #[test]
    fn blank_location_is_absent() {
        let mut intent = Intent::new(Action::Navigate);
        intent.location_query = Some("   ".to_string());
        assert_eq!(intent.location(), None);
    }
}
