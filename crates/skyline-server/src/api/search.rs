//! Search endpoints.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use skyline_core::{BoundingBox, RouteResponse, SearchRequest};
use std::sync::Arc;
use tracing::Instrument;

use super::error::ApiError;
use crate::state::AppState;

/// Query string of the legacy `GET /v1/search`.
#[derive(Debug, Default, Deserialize)]
pub struct LegacySearchParams {
    #[serde(default)]
    pub q: String,
    pub south: Option<f64>,
    pub west: Option<f64>,
    pub north: Option<f64>,
    pub east: Option<f64>,
}

impl LegacySearchParams {
    /// The POST contract for these parameters. Bounds count only when all
    /// four edges are given.
    pub fn into_request(self) -> Result<SearchRequest, ApiError> {
        match (self.south, self.west, self.north, self.east) {
            (Some(south), Some(west), Some(north), Some(east)) => {
                let bounds = BoundingBox::new(south, west, north, east)?;
                Ok(SearchRequest::with_viewport(self.q, bounds))
            }
            (None, None, None, None) => Ok(SearchRequest::new(self.q)),
            _ => Err(ApiError::Malformed(
                "south, west, north and east must be given together".to_string(),
            )),
        }
    }
}

/// `POST /v1/search`
pub async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::Malformed(rejection.body_text()))?;
    run_search(&state, request).await
}

/// `GET /v1/search?q=..&south=..&west=..&north=..&east=..`
pub async fn search_legacy(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LegacySearchParams>, QueryRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::Malformed(rejection.body_text()))?;
    run_search(&state, params.into_request()?).await
}

async fn run_search(state: &AppState, request: SearchRequest) -> Result<Json<RouteResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::EmptyQuery);
    }
    request.validate()?;
    tracing::info!(query = %request.query, viewport = request.current_bounds.is_some(), "Search");

    // A panic while routing surfaces as a JoinError instead of a dropped connection.
    let router = state.router.clone();
    let response = tokio::spawn(
        async move { router.search(&request).await }.instrument(tracing::Span::current()),
    )
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))?;

    tracing::info!(action = %response.action, fly = response.should_fly_to, "Search complete");
    Ok(Json(response))
}
