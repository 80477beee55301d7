use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skyline_core::GeoError;
use thiserror::Error;

/// Failures surfaced to HTTP clients as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Query must not be empty")]
    EmptyQuery,
    #[error("Invalid bounds: {0}")]
    InvalidBounds(#[from] GeoError),
    #[error("Malformed request: {0}")]
    Malformed(String),
    #[error("Search error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyQuery | Self::InvalidBounds(_) | Self::Malformed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Search failed");
        } else {
            tracing::debug!(error = %self, "Rejected search request");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
