//! Intent routing: one handler per action, all producing a `RouteResponse`.

mod buildings;
mod controls;
mod places;

use crate::assistant::Assistant;
use skyline_core::{Action, Intent, RouteResponse, SearchRequest};
use skyline_osm::{LocationResolver, SpatialSource};
use std::sync::Arc;

/// Zoom used when flying to a ranked or deleted building.
pub const BUILDING_ZOOM: u8 = 17;
/// Zoom used when flying to a question's subject.
pub const QUESTION_ZOOM: u8 = 16;
/// Zoom used for a search center when nothing was found there.
pub const AREA_ZOOM: u8 = 15;

/// Radius searched around the subject of a question.
pub const QUESTION_RADIUS_KM: f64 = 1.0;
/// Default radius for "tallest" searches around a named place.
pub const HEIGHT_SEARCH_RADIUS_KM: f64 = 2.0;
/// Default radius for other building searches around a named place.
pub const SEARCH_RADIUS_KM: f64 = 1.0;
/// Buildings returned by an area exploration (target plus candidates).
pub const AREA_RESULT_COUNT: usize = 6;

/// Holds the shared collaborators; carries no per-request state.
#[derive(Clone)]
pub struct SearchRouter {
    assistant: Assistant,
    resolver: Arc<dyn LocationResolver>,
    spatial: Arc<dyn SpatialSource>,
}

impl SearchRouter {
    pub fn new(
        assistant: Assistant,
        resolver: Arc<dyn LocationResolver>,
        spatial: Arc<dyn SpatialSource>,
    ) -> Self {
        Self {
            assistant,
            resolver,
            spatial,
        }
    }

    /// Classify the query, then dispatch it.
    pub async fn search(&self, request: &SearchRequest) -> RouteResponse {
        let intent = self.assistant.parser.parse(&request.query).await;
        tracing::debug!(
            action = %intent.action,
            location = ?intent.location(),
            reasoning = ?intent.reasoning,
            "Parsed intent"
        );
        self.dispatch(intent, request).await
    }

    pub async fn dispatch(&self, intent: Intent, request: &SearchRequest) -> RouteResponse {
        match intent.action {
            Action::SetWeather => controls::set_weather(intent),
            Action::SetTime => controls::set_time(intent),
            Action::CameraControl => controls::camera_control(intent),
            Action::DeleteBuilding => self.delete_building(intent).await,
            Action::Question => self.question(intent, &request.query).await,
            Action::Navigate => self.navigate(intent, &request.query).await,
            Action::FindBuilding => self.find_building(intent, request).await,
            Action::SearchArea => self.search_area(intent, request).await,
            Action::Unknown => {
                tracing::debug!("Unrecognized action, exploring the visible area");
                self.search_area(intent, request).await
            }
        }
    }
}
