//! Footprint area and height estimates for normalized buildings.

use crate::models::{BuildingFeature, TagMap};

/// Square meters per square degree, applied uniformly (city-scale approximation).
pub const SQ_METERS_PER_SQ_DEG: f64 = 111_320.0 * 111_320.0;
pub const METERS_PER_LEVEL: f64 = 3.0;
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Planar shoelace area of a ring in square degrees.
pub fn ring_area_deg2(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    // Relative to the first vertex, so small rings far from (0, 0) keep precision.
    let [ox, oy] = ring[0];
    let mut sum = 0.0;
    for i in 0..n {
        let [x1, y1] = ring[i];
        let [x2, y2] = ring[(i + 1) % n];
        sum += (x1 - ox) * (y2 - oy) - (x2 - ox) * (y1 - oy);
    }
    sum.abs() / 2.0
}

/// Footprint area in square meters.
///
/// Not geodesically exact: the degree-space area is scaled by a fixed factor,
/// which overstates longitude extent away from the equator.
pub fn area_m2(feature: &BuildingFeature) -> f64 {
    ring_area_deg2(feature.ring()) * SQ_METERS_PER_SQ_DEG
}

/// Height in meters from `height`, else `building:levels` × 3 m, else 0.
pub fn estimated_height_m(feature: &BuildingFeature) -> f64 {
    height_from_tags(&feature.properties)
}

pub fn height_from_tags(tags: &TagMap) -> f64 {
    if let Some(height) = tags.get("height").and_then(|raw| parse_height(raw)) {
        return height;
    }
    tags.get("building:levels")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|levels| levels.is_finite() && *levels > 0.0)
        .map(|levels| levels * METERS_PER_LEVEL)
        .unwrap_or(0.0)
}

/// Leading number of a height tag in meters; feet are converted.
///
/// Accepts `"30"`, `"30 m"`, `"30ft"`, `"98 feet"`, `"12'"`. Returns `None`
/// for missing, non-numeric or non-positive values.
pub fn parse_height(raw: &str) -> Option<f64> {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let mut digits = String::new();
    let mut end_idx = 0usize;
    let mut started = false;

    for (idx, ch) in lower.char_indices() {
        if !started && ch.is_whitespace() {
            continue;
        }
        if ch.is_ascii_digit() || ch == '.' || (!started && ch == '-') {
            started = true;
            digits.push(ch);
            end_idx = idx + ch.len_utf8();
            continue;
        }
        break;
    }

    if digits.is_empty() {
        return None;
    }

    let mut height = digits.parse::<f64>().ok()?;
    let unit = lower.get(end_idx..).unwrap_or("").trim_start();
    let is_feet = unit.starts_with("ft")
        || unit.starts_with("feet")
        || unit.starts_with("foot")
        || unit.starts_with('\'');
    if is_feet {
        height *= METERS_PER_FOOT;
    }

    if !height.is_finite() || height <= 0.0 {
        return None;
    }
    Some(height)
}

/// Vertex average of the outer ring as `[lon, lat]`, closing vertex excluded.
pub fn centroid(feature: &BuildingFeature) -> Option<[f64; 2]> {
    let ring = feature.ring();
    let vertices = match ring {
        [] => return None,
        [single] => return Some(*single),
        _ if ring.first() == ring.last() => &ring[..ring.len() - 1],
        _ => ring,
    };

    let count = vertices.len() as f64;
    let (sum_lon, sum_lat) = vertices
        .iter()
        .fold((0.0, 0.0), |(lon, lat), [x, y]| (lon + x, lat + y));
    Some([sum_lon / count, sum_lat / count])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_with_tags(pairs: &[(&str, &str)]) -> BuildingFeature {
        let tags = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BuildingFeature::square(Some(1), [0.0, 0.0], 0.0001, tags)
    }

    #[test]
    fn one_degree_square_at_equator() {
        let feature = BuildingFeature::square(None, [0.0, 0.0], 0.5, TagMap::new());
        let expected = 111_320.0 * 111_320.0;
        assert!((area_m2(&feature) - expected).abs() < 1e-3);
    }

    #[test]
    fn area_ignores_winding_direction() {
        let clockwise = BuildingFeature::polygon(
            None,
            vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            TagMap::new(),
        );
        assert!((ring_area_deg2(clockwise.ring()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn small_footprint_far_from_origin_keeps_precision() {
        let side_deg = (90.0 / SQ_METERS_PER_SQ_DEG).sqrt();
        let feature = BuildingFeature::square(None, [-79.38, 43.65], side_deg / 2.0, TagMap::new());
        assert!((area_m2(&feature) / 90.0 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn feet_are_converted() {
        let feature = feature_with_tags(&[("height", "30ft")]);
        assert!((estimated_height_m(&feature) - 9.144).abs() < 1e-9);
        assert!((parse_height("98 feet").unwrap() - 29.8704).abs() < 1e-9);
        assert!((parse_height("10'").unwrap() - 3.048).abs() < 1e-9);
    }

    #[test]
    fn metric_suffix_is_stripped() {
        assert_eq!(parse_height("553.3 m"), Some(553.3));
        assert_eq!(parse_height("42m"), Some(42.0));
        assert_eq!(parse_height(" 12 "), Some(12.0));
    }

    #[test]
    fn levels_fallback() {
        let feature = feature_with_tags(&[("building:levels", "10")]);
        assert_eq!(estimated_height_m(&feature), 30.0);
    }

    #[test]
    fn unparseable_height_uses_levels() {
        let feature = feature_with_tags(&[("height", "tall"), ("building:levels", "4")]);
        assert_eq!(estimated_height_m(&feature), 12.0);
    }

    #[test]
    fn missing_or_garbage_is_zero() {
        assert_eq!(estimated_height_m(&feature_with_tags(&[])), 0.0);
        assert_eq!(
            estimated_height_m(&feature_with_tags(&[("height", "unknown"), ("building:levels", "many")])),
            0.0
        );
        assert_eq!(parse_height("-5"), None);
        assert_eq!(parse_height(""), None);
    }

    #[test]
    fn centroid_skips_closing_vertex() {
        let feature = BuildingFeature::polygon(
            None,
            vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]],
            TagMap::new(),
        );
        assert_eq!(centroid(&feature), Some([1.0, 1.0]));
    }
}
