//! HTTP surface of the search service.

mod error;
pub mod request_id;
mod search;

pub use error::ApiError;
pub use search::LegacySearchParams;

use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/search", post(search::search).get(search::search_legacy))
        .route("/health", get(health))
}

/// Routes plus the request-id, tracing and CORS layers, bound to `state`.
pub fn app(state: Arc<AppState>) -> Router {
    routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::ensure_request_id))
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
