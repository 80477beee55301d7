//! Handlers that start from a named place: navigation, deletion and questions.

use super::{SearchRouter, BUILDING_ZOOM, QUESTION_RADIUS_KM, QUESTION_ZOOM};
use skyline_core::{
    normalize_all, Action, BoundingBox, BuildingFeature, Intent, RouteResponse, TagMap,
};

/// Half-width (degrees) of the removal square for narrow towers.
const TOWER_DELETE_HALF_WIDTH_DEG: f64 = 0.0004;
/// Half-width for stadiums and other wide venues.
const VENUE_DELETE_HALF_WIDTH_DEG: f64 = 0.0012;
const DEFAULT_DELETE_HALF_WIDTH_DEG: f64 = 0.0006;

static TOWER_NAMES: &[&str] = &[
    "cn tower",
    "eiffel tower",
    "empire state",
    "burj khalifa",
    "tokyo tower",
    "space needle",
];
static VENUE_NAMES: &[&str] = &["rogers centre", "skydome", "stadium", "arena", "convention"];

const DELETE_PROMPT: &str =
    "Select a building to delete or specify a location (e.g., 'delete the building at 123 Main St')";

fn delete_half_width(location_query: &str) -> f64 {
    let lower = location_query.to_lowercase();
    if TOWER_NAMES.iter().any(|name| lower.contains(name)) {
        TOWER_DELETE_HALF_WIDTH_DEG
    } else if VENUE_NAMES.iter().any(|name| lower.contains(name)) {
        VENUE_DELETE_HALF_WIDTH_DEG
    } else {
        DEFAULT_DELETE_HALF_WIDTH_DEG
    }
}

/// First feature whose name contains the target (or is contained by it),
/// ignoring case; otherwise the first feature.
pub(super) fn match_by_name(mut features: Vec<BuildingFeature>, target: &str) -> Option<BuildingFeature> {
    let target = target.trim().to_lowercase();
    let position = features.iter().position(|feature| {
        feature.name().is_some_and(|name| {
            let name = name.to_lowercase();
            name.contains(&target) || target.contains(&name)
        })
    });
    match position {
        Some(index) => Some(features.swap_remove(index)),
        None => features.into_iter().next(),
    }
}

impl SearchRouter {
    pub(super) async fn navigate(&self, intent: Intent, raw_query: &str) -> RouteResponse {
        let place = intent
            .location()
            .unwrap_or_else(|| raw_query.trim())
            .to_string();

        match self.resolver.resolve(&place).await {
            Some(location) => {
                let answer = format!("Flying to {}", location.display_name);
                RouteResponse::fly_to(
                    intent,
                    Action::Navigate,
                    answer,
                    location.point(),
                    location.zoom_level(),
                )
            }
            None => RouteResponse::message(
                intent,
                Action::Navigate,
                format!("I couldn't find '{place}'. Please try a different location."),
            ),
        }
    }

    /// Marks a square around the named place for removal from the scene.
    pub(super) async fn delete_building(&self, intent: Intent) -> RouteResponse {
        let Some(place) = intent.location().map(str::to_string) else {
            return RouteResponse::message(intent, Action::DeleteBuilding, DELETE_PROMPT);
        };

        let Some(location) = self.resolver.resolve(&place).await else {
            return RouteResponse::message(
                intent,
                Action::DeleteBuilding,
                format!("Couldn't find location: {place}"),
            );
        };

        let mut properties = TagMap::new();
        properties.insert("name".to_string(), place.clone());
        let target = BuildingFeature::square(
            None,
            location.point(),
            delete_half_width(&place),
            properties,
        );
        tracing::info!(place = %place, "Deleting building");

        RouteResponse {
            delete_target: Some(target),
            ..RouteResponse::fly_to(
                intent,
                Action::DeleteBuilding,
                format!("Deleting {place}..."),
                location.point(),
                BUILDING_ZOOM,
            )
        }
    }

    pub(super) async fn question(&self, intent: Intent, raw_query: &str) -> RouteResponse {
        let mut coordinates = None;
        let mut building = None;

        if let Some(target_name) = intent.target_name() {
            if let Some(location) = self.resolver.resolve(target_name).await {
                let center = location.point();
                coordinates = Some(center);
                let bbox = BoundingBox::expand_from_center(center, QUESTION_RADIUS_KM).clamp();
                let features = normalize_all(self.spatial.fetch_features(&bbox, true).await);
                building = match_by_name(features, target_name);
            }
        }

        let answer = self
            .assistant
            .qa
            .answer(raw_query, building.as_ref(), intent.question_context.as_ref())
            .await;
        let qa_data = building.as_ref().map(|feature| feature.properties.clone());

        RouteResponse {
            coordinates,
            should_fly_to: coordinates.is_some(),
            zoom_level: coordinates.map(|_| QUESTION_ZOOM),
            target: building,
            qa_data,
            ..RouteResponse::message(intent, Action::Question, answer)
        }
    }
}
