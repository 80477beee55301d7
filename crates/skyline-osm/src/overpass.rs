//! Overpass API client with ordered endpoint failover.

use crate::error::FetchError;
use crate::source::SpatialSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use skyline_core::{BoundingBox, RawElement};
use std::time::Duration;

pub const DEFAULT_OVERPASS_ENDPOINTS: &[&str] = &[
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://z.overpass-api.de/api/interpreter",
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Server-side query timeout embedded in the QL header.
const QUERY_TIMEOUT_S: u32 = 15;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Value>,
}

/// Fetches building elements from the first Overpass endpoint that answers.
///
/// Endpoints are tried strictly in order, one attempt each. Any transport
/// error, timeout, non-success status or undecodable body moves on to the next
/// endpoint; when all of them fail the result is empty.
#[derive(Debug, Clone)]
pub struct OverpassFetcher {
    client: Client,
    endpoints: Vec<String>,
    timeout: Duration,
}

impl OverpassFetcher {
    pub fn new(endpoints: Vec<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoints,
            timeout,
        }
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Overpass QL for `bbox`, after clamping it to the maximum span.
    pub fn build_query(bbox: &BoundingBox, include_tall_structures: bool) -> String {
        let bbox = bbox.clamp().to_overpass();
        let statements: Vec<String> = if include_tall_structures {
            vec![
                format!("way[\"building\"]({bbox});"),
                format!("way[\"man_made\"=\"tower\"]({bbox});"),
                format!("way[\"man_made\"=\"mast\"]({bbox});"),
                format!("way[\"tourism\"=\"attraction\"][\"height\"]({bbox});"),
                format!("node[\"man_made\"=\"tower\"]({bbox});"),
                format!("node[\"tourism\"=\"attraction\"][\"height\"]({bbox});"),
                format!("relation[\"building\"]({bbox});"),
                format!("relation[\"man_made\"=\"tower\"]({bbox});"),
                format!("relation[\"tourism\"=\"attraction\"]({bbox});"),
            ]
        } else {
            vec![format!("way[\"building\"]({bbox});")]
        };

        format!(
            "[out:json][timeout:{QUERY_TIMEOUT_S}];\n(\n  {}\n);\nout geom;",
            statements.join("\n  ")
        )
    }

    async fn attempt(&self, endpoint: &str, query: &str) -> Result<Vec<RawElement>, FetchError> {
        let response = self
            .client
            .post(endpoint)
            .timeout(self.timeout)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|err| FetchError::transport(endpoint, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let payload: OverpassResponse = response
            .json()
            .await
            .map_err(|err| FetchError::decode(endpoint, err.to_string()))?;

        Ok(decode_elements(payload.elements))
    }
}

impl Default for OverpassFetcher {
    fn default() -> Self {
        Self::new(
            DEFAULT_OVERPASS_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_TIMEOUT,
        )
    }
}

/// Decodes each element on its own so one malformed record is dropped
/// instead of failing the whole response.
fn decode_elements(values: Vec<Value>) -> Vec<RawElement> {
    let total = values.len();
    let elements: Vec<RawElement> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(element) => Some(element),
            Err(err) => {
                tracing::debug!("Dropping undecodable Overpass element: {}", err);
                None
            }
        })
        .collect();
    if elements.len() < total {
        tracing::debug!(
            "Decoded {} of {} Overpass elements",
            elements.len(),
            total
        );
    }
    elements
}

#[async_trait]
impl SpatialSource for OverpassFetcher {
    async fn fetch_features(
        &self,
        bbox: &BoundingBox,
        include_tall_structures: bool,
    ) -> Vec<RawElement> {
        let query = Self::build_query(bbox, include_tall_structures);

        for endpoint in &self.endpoints {
            tracing::debug!(endpoint = %endpoint, tall = include_tall_structures, "Querying Overpass");
            match self.attempt(endpoint, &query).await {
                Ok(elements) => {
                    tracing::debug!(endpoint = %endpoint, count = elements.len(), "Overpass answered");
                    return elements;
                }
                Err(err) => {
                    tracing::warn!("Overpass endpoint failed, trying next: {}", err);
                }
            }
        }

        tracing::warn!(
            "All {} Overpass endpoints failed; returning no buildings",
            self.endpoints.len()
        );
        Vec::new()
    }
}
