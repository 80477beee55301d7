//! Seams between the router and the outside world.

use async_trait::async_trait;
use skyline_core::{BoundingBox, RawElement, ResolvedLocation};

/// Raw building elements for an area.
#[async_trait]
pub trait SpatialSource: Send + Sync {
    /// Elements inside `bbox`. With `include_tall_structures` towers, masts
    /// and tall attractions are requested as well, including point nodes and
    /// relations. Never fails: an unreachable provider yields an empty list.
    async fn fetch_features(
        &self,
        bbox: &BoundingBox,
        include_tall_structures: bool,
    ) -> Vec<RawElement>;
}

/// Forward geocoding of a free-form place name.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Best match for `name`, or `None` when nothing matches or the provider
    /// is unavailable.
    async fn resolve(&self, name: &str) -> Option<ResolvedLocation>;
}
