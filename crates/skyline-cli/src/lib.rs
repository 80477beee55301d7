//! Skyline CLI - argument parsing and output formatting for `skyline-ask`.

use anyhow::{Context, Result};
use skyline_core::{BoundingBox, RouteResponse};
use skyline_sdk::SearchRequest;

/// Parses `south,west,north,east`.
pub fn parse_bounds(raw: &str) -> Result<BoundingBox> {
    let values = parse_floats(raw)?;
    let [south, west, north, east] = values[..] else {
        anyhow::bail!("expected south,west,north,east, got '{}'", raw);
    };
    Ok(BoundingBox::new(south, west, north, east)?)
}

/// Parses `lon,lat`.
pub fn parse_center(raw: &str) -> Result<[f64; 2]> {
    let values = parse_floats(raw)?;
    let [lon, lat] = values[..] else {
        anyhow::bail!("expected lon,lat, got '{}'", raw);
    };
    Ok([lon, lat])
}

fn parse_floats(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number '{}'", part.trim()))
        })
        .collect()
}

/// Request for the given query and optional viewport. An explicit center
/// overrides the viewport midpoint.
pub fn build_request(query: &str, bounds: Option<BoundingBox>, center: Option<[f64; 2]>) -> SearchRequest {
    let mut request = match bounds {
        Some(bounds) => SearchRequest::with_viewport(query, bounds),
        None => SearchRequest::new(query),
    };
    if center.is_some() {
        request.current_center = center;
    }
    request
}

/// Human-readable summary of a search response.
pub fn render(response: &RouteResponse) -> String {
    let mut lines = vec![response.answer.clone(), format!("  action: {}", response.action)];
    if let Some([lon, lat]) = response.coordinates {
        let zoom = response
            .zoom_level
            .map(|zoom| format!(" (zoom {zoom})"))
            .unwrap_or_default();
        let fly = if response.should_fly_to { "fly to" } else { "at" };
        lines.push(format!("  {fly}: {lat:.5}, {lon:.5}{zoom}"));
    }
    if let Some(target) = &response.target {
        let label = target.name().unwrap_or("unnamed building");
        lines.push(format!("  target: {label}"));
    }
    if !response.candidates.is_empty() {
        lines.push(format!("  candidates: {}", response.candidates.len()));
    }
    lines.join("\n")
}
