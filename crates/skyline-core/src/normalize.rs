//! Conversion of raw spatial elements into building polygons.
//!
//! The spatial provider models buildings as ways (vertex lists), as point
//! nodes (towers and attractions are often a single tagged coordinate), or as
//! relations grouping several member ways. Everything is reduced to one closed
//! outer ring; elements that cannot form a usable ring are dropped.

use crate::metrics::{parse_height, ring_area_deg2};
use crate::models::{BuildingFeature, TagMap};
use serde::Deserialize;

/// Half-width for point towers and attractions (~80 m).
const TOWER_HALF_WIDTH_DEG: f64 = 0.0008;
/// Half-width for points taller than `TALL_POINT_MIN_HEIGHT_M` (~60 m).
const TALL_HALF_WIDTH_DEG: f64 = 0.0006;
/// Half-width for any other point (~30 m).
const DEFAULT_HALF_WIDTH_DEG: f64 = 0.0003;
const TALL_POINT_MIN_HEIGHT_M: f64 = 100.0;

/// Rings with less area than this (square degrees) are treated as collinear.
const DEGENERATE_AREA_DEG2: f64 = 1.0e-14;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMember {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub geometry: Vec<LatLon>,
}

/// One element of an Overpass `out geom` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: TagMap,
    },
    Way {
        id: i64,
        #[serde(default)]
        geometry: Vec<LatLon>,
        #[serde(default)]
        tags: TagMap,
    },
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<RawMember>,
        #[serde(default)]
        tags: TagMap,
    },
    #[serde(other)]
    Unsupported,
}

/// Normalize one element, or `None` when it has no usable footprint.
pub fn normalize(element: RawElement) -> Option<BuildingFeature> {
    match element {
        RawElement::Way { id, geometry, tags } => {
            let ring = close_ring(to_lon_lat(&geometry))?;
            Some(BuildingFeature::polygon(Some(id), ring, tags))
        }
        RawElement::Node { id, lat, lon, tags } => {
            if !lat.is_finite() || !lon.is_finite() {
                return None;
            }
            let half_width = point_half_width(&tags);
            Some(BuildingFeature::square(Some(id), [lon, lat], half_width, tags))
        }
        RawElement::Relation { id, members, tags } => {
            let ring = relation_ring(&members)?;
            Some(BuildingFeature::polygon(Some(id), ring, tags))
        }
        RawElement::Unsupported => None,
    }
}

pub fn normalize_all(elements: Vec<RawElement>) -> Vec<BuildingFeature> {
    elements.into_iter().filter_map(normalize).collect()
}

fn to_lon_lat(points: &[LatLon]) -> Vec<[f64; 2]> {
    points.iter().map(|point| [point.lon, point.lat]).collect()
}

/// Closes an open ring; rejects short, non-finite or zero-area rings.
fn close_ring(mut ring: Vec<[f64; 2]>) -> Option<Vec<[f64; 2]>> {
    if ring.len() < 3 {
        return None;
    }
    if ring.iter().flatten().any(|value| !value.is_finite()) {
        return None;
    }
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    if ring.len() < 4 || ring_area_deg2(&ring) < DEGENERATE_AREA_DEG2 {
        return None;
    }
    Some(ring)
}

fn point_half_width(tags: &TagMap) -> f64 {
    let is_landmark = tags.get("man_made").map(String::as_str) == Some("tower")
        || tags.get("tourism").map(String::as_str) == Some("attraction");
    if is_landmark {
        return TOWER_HALF_WIDTH_DEG;
    }
    let height = tags.get("height").and_then(|raw| parse_height(raw));
    match height {
        Some(height) if height > TALL_POINT_MIN_HEIGHT_M => TALL_HALF_WIDTH_DEG,
        _ => DEFAULT_HALF_WIDTH_DEG,
    }
}

/// Outer member ways concatenated into one ring. Without outer geometry the
/// first member carrying a ring-sized geometry is used instead; inner rings
/// and multi-part shapes are not reconstructed.
fn relation_ring(members: &[RawMember]) -> Option<Vec<[f64; 2]>> {
    let outer: Vec<[f64; 2]> = members
        .iter()
        .filter(|member| member.role == "outer" && member.kind == "way")
        .flat_map(|member| to_lon_lat(&member.geometry))
        .collect();
    if outer.len() >= 3 {
        return close_ring(outer);
    }

    members
        .iter()
        .find(|member| member.geometry.len() >= 3)
        .and_then(|member| close_ring(to_lon_lat(&member.geometry)))
}
