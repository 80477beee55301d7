//! Ranked building search and area exploration.

use super::{
    SearchRouter, AREA_RESULT_COUNT, AREA_ZOOM, BUILDING_ZOOM, HEIGHT_SEARCH_RADIUS_KM,
    SEARCH_RADIUS_KM,
};
use skyline_core::{
    normalize_all, rank, Action, BoundingBox, Intent, RankedResult, ResolvedLocation,
    RouteResponse, SearchRequest, SortBy,
};

/// Display-name words that mark a resolved place as a tall landmark.
static TALL_LANDMARK_WORDS: &[&str] = &["tower", "skyscraper", "building", "centre", "center"];
static LANDMARK_LOCATION_TYPES: &[&str] = &["poi", "place"];

const NO_GEOGRAPHY: &str = "I need a location or visible map area to search buildings.";
const NO_VIEWPORT: &str = "I need a visible map area to explore buildings.";
const NOTHING_IN_AREA: &str = "No buildings found in this area.";

/// Whether a "tallest building in X" lookup landed on a famous structure.
///
/// A plain keyword test on the display name, so any "... Centre" point of
/// interest qualifies as well.
fn is_tall_landmark(location: &ResolvedLocation) -> bool {
    if !LANDMARK_LOCATION_TYPES.contains(&location.location_type.as_str()) {
        return false;
    }
    let name = location.display_name.to_lowercase();
    TALL_LANDMARK_WORDS.iter().any(|word| name.contains(word))
}

/// Where a building search looks.
struct SearchArea {
    bbox: BoundingBox,
    center: Option<[f64; 2]>,
    location_name: Option<String>,
}

impl SearchRouter {
    pub(super) async fn find_building(&self, intent: Intent, request: &SearchRequest) -> RouteResponse {
        let sort_by = intent.sort_by();
        let mut area = None;

        if let Some(place) = intent.location().map(str::to_string) {
            if sort_by == SortBy::Height {
                let landmark = self
                    .resolver
                    .resolve(&format!("tallest building {place}"))
                    .await;
                if let Some(landmark) = landmark.filter(is_tall_landmark) {
                    tracing::debug!(landmark = %landmark.display_name, "Tallest-building query matched a landmark");
                    let answer = format!("Flying to {}", landmark.display_name);
                    return RouteResponse::fly_to(
                        intent,
                        Action::Navigate,
                        answer,
                        landmark.point(),
                        landmark.zoom_level(),
                    );
                }
            }

            if let Some(location) = self.resolver.resolve(&place).await {
                let default_radius = if sort_by == SortBy::Height {
                    HEIGHT_SEARCH_RADIUS_KM
                } else {
                    SEARCH_RADIUS_KM
                };
                let center = location.point();
                area = Some(SearchArea {
                    bbox: BoundingBox::expand_from_center(
                        center,
                        intent.search_radius_km_or(default_radius),
                    ),
                    center: Some(center),
                    location_name: Some(location.display_name),
                });
            }
        }

        let area = area.or_else(|| {
            request.current_bounds.map(|bbox| SearchArea {
                bbox,
                center: request.current_center,
                location_name: None,
            })
        });
        let Some(area) = area else {
            return RouteResponse::message(intent, Action::FindBuilding, NO_GEOGRAPHY);
        };

        let include_tall = sort_by == SortBy::Height;
        let elements = self
            .spatial
            .fetch_features(&area.bbox.clamp(), include_tall)
            .await;
        let ranked = rank(normalize_all(elements), sort_by);
        let RankedResult { target, candidates } = RankedResult::from_ranked(ranked, intent.limit());

        let answer = self
            .assistant
            .answers
            .generate(
                &request.query,
                target.as_ref(),
                area.location_name.as_deref(),
                &intent,
            )
            .await;

        match target {
            Some(target) => {
                tracing::debug!(
                    id = ?target.id,
                    candidates = candidates.len(),
                    "Ranked buildings"
                );
                RouteResponse {
                    coordinates: target.centroid().or(area.center),
                    should_fly_to: true,
                    zoom_level: Some(BUILDING_ZOOM),
                    target: Some(target),
                    candidates,
                    ..RouteResponse::message(intent, Action::FindBuilding, answer)
                }
            }
            None => RouteResponse {
                coordinates: area.center,
                should_fly_to: area.center.is_some(),
                zoom_level: area.center.map(|_| AREA_ZOOM),
                ..RouteResponse::message(intent, Action::FindBuilding, answer)
            },
        }
    }

    /// Largest footprints in the visible area.
    pub(super) async fn search_area(&self, intent: Intent, request: &SearchRequest) -> RouteResponse {
        let Some(bounds) = request.current_bounds else {
            return RouteResponse::message(intent, Action::SearchArea, NO_VIEWPORT);
        };

        let features = normalize_all(self.spatial.fetch_features(&bounds.clamp(), false).await);
        let found = features.len();
        let RankedResult { target, candidates } =
            RankedResult::from_ranked(rank(features, SortBy::Area), AREA_RESULT_COUNT);

        let Some(target) = target else {
            return RouteResponse {
                coordinates: request.current_center,
                ..RouteResponse::message(intent, Action::SearchArea, NOTHING_IN_AREA)
            };
        };

        RouteResponse {
            coordinates: target.centroid().or(request.current_center),
            target: Some(target),
            candidates,
            ..RouteResponse::message(
                intent,
                Action::SearchArea,
                format!("Found {found} buildings in this area."),
            )
        }
    }
}
