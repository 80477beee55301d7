//! Ordering of building candidates by a requested criterion.

use crate::intent::SortBy;
use crate::models::BuildingFeature;
use std::cmp::Ordering;

/// Height floor used by the underdeveloped ratio so unknown heights do not
/// divide by zero.
const UNDERDEVELOPED_MIN_HEIGHT_M: f64 = 3.0;

/// Descending ranking key for one feature.
pub fn ranking_key(feature: &BuildingFeature, sort_by: SortBy) -> f64 {
    match sort_by {
        SortBy::Height => feature.estimated_height_m(),
        SortBy::Underdeveloped => {
            feature.area_m2() / feature.estimated_height_m().max(UNDERDEVELOPED_MIN_HEIGHT_M)
        }
        SortBy::Area | SortBy::Unspecified => feature.area_m2(),
    }
}

/// Stable descending sort. Features without a closed polygon are excluded.
pub fn rank(features: Vec<BuildingFeature>, sort_by: SortBy) -> Vec<BuildingFeature> {
    let mut keyed: Vec<(f64, BuildingFeature)> = features
        .into_iter()
        .filter(BuildingFeature::is_closed_polygon)
        .map(|feature| (ranking_key(&feature, sort_by), feature))
        .collect();

    keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, feature)| feature).collect()
}

/// Top feature plus runners-up for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedResult {
    pub target: Option<BuildingFeature>,
    pub candidates: Vec<BuildingFeature>,
}

impl RankedResult {
    /// First ranked feature as target, the next `limit - 1` as candidates.
    pub fn from_ranked(ranked: Vec<BuildingFeature>, limit: usize) -> Self {
        let mut iter = ranked.into_iter();
        let target = iter.next();
        let candidates = iter.take(limit.saturating_sub(1)).collect();
        Self { target, candidates }
    }
}
