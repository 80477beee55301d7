//! Shared application state.

use crate::assistant::Assistant;
use crate::config::Config;
use crate::router::SearchRouter;
use skyline_osm::{NominatimResolver, OverpassFetcher};
use std::sync::Arc;

/// State handed to every handler. Immutable once the server is up.
pub struct AppState {
    pub router: SearchRouter,
}

impl AppState {
    pub fn new(router: SearchRouter) -> Self {
        Self { router }
    }

    /// Wires the Overpass fetcher, the Nominatim resolver and the assistant
    /// selected by `config`.
    pub fn from_config(config: &Config) -> Self {
        let spatial = OverpassFetcher::new(
            config.overpass_endpoints.clone(),
            config.overpass_timeout,
        );
        let resolver = NominatimResolver::new(
            config.nominatim_url.clone(),
            config.nominatim_user_agent.clone(),
            config.geocoder_timeout,
        );
        tracing::info!(
            endpoints = spatial.endpoints().len(),
            geocoder = %config.nominatim_url,
            "Spatial sources configured"
        );

        Self::new(SearchRouter::new(
            Assistant::from_config(config),
            Arc::new(resolver),
            Arc::new(spatial),
        ))
    }
}
