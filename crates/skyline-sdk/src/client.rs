//! HTTP client for the search server.

use anyhow::{Context, Result};
use serde::Deserialize;
use skyline_core::{BoundingBox, RouteResponse, SearchRequest};

/// Client for a running Skyline search server.
#[derive(Debug, Clone)]
pub struct SkylineClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

impl SkylineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /v1/search`.
    pub async fn search(&self, request: &SearchRequest) -> Result<RouteResponse> {
        let url = format!("{}/v1/search", self.base_url);
        tracing::debug!(%url, query = %request.query, "Sending search");
        let response = self.client.post(&url).json(request).send().await?;
        decode(response).await
    }

    /// Legacy `GET /v1/search` with an optional viewport.
    pub async fn search_legacy(&self, query: &str, bounds: Option<&BoundingBox>) -> Result<RouteResponse> {
        let url = format!("{}/v1/search", self.base_url);
        let mut params = vec![("q", query.to_string())];
        if let Some(bounds) = bounds {
            params.extend([
                ("south", bounds.south.to_string()),
                ("west", bounds.west.to_string()),
                ("north", bounds.north.to_string()),
                ("east", bounds.east.to_string()),
            ]);
        }
        let response = self.client.get(&url).query(&params).send().await?;
        decode(response).await
    }

    /// True when the server reports itself healthy.
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let body: HealthBody = response.json().await?;
        Ok(body.status == "healthy")
    }
}

async fn decode(response: reqwest::Response) -> Result<RouteResponse> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        anyhow::bail!("Search failed ({}): {}", status, message);
    }
    response
        .json()
        .await
        .context("Failed to decode search response")
}
