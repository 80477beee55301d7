//! Template prose used when no remote answer generator is reachable.

use crate::intent::{Intent, QuestionContext, SortBy};
use crate::metrics::parse_height;
use crate::models::BuildingFeature;

const NAME_TAGS: &[&str] = &["name", "addr:housename", "addr:housenumber"];

/// Human label for a feature, falling back to address tags.
pub fn display_name(feature: &BuildingFeature) -> &str {
    NAME_TAGS
        .iter()
        .find_map(|key| feature.tag(key))
        .unwrap_or("this building")
}

/// One-sentence summary of a ranked building search.
pub fn search_answer(
    top: Option<&BuildingFeature>,
    location_name: Option<&str>,
    intent: Option<&Intent>,
) -> String {
    let Some(top) = top else {
        return match location_name {
            Some(place) => format!("No buildings found near {place}."),
            None => "No buildings found in this area.".to_string(),
        };
    };

    let name = display_name(top);
    match intent.map(Intent::sort_by).unwrap_or_default() {
        SortBy::Height => {
            let height = top
                .tag("height")
                .or_else(|| top.tag("building:levels"))
                .unwrap_or("unknown");
            format!("The tallest building is {name} ({height}).")
        }
        SortBy::Area => format!("The building with the largest footprint is {name}."),
        SortBy::Underdeveloped => {
            format!("The most underdeveloped building (large footprint, low height) is {name}.")
        }
        SortBy::Unspecified => format!("Found {name} matching your query."),
    }
}

/// Answer to a factual question about one building, from its tags only.
pub fn qa_answer(
    query: &str,
    building: Option<&BuildingFeature>,
    context: Option<&QuestionContext>,
) -> String {
    let Some(building) = building else {
        return "I don't have enough information to answer that question.".to_string();
    };

    let name = building.name().unwrap_or("this building");
    let lower = query.to_lowercase();
    let subject = context.and_then(|ctx| ctx.subject.as_deref()).unwrap_or("");

    if subject == "building_height" || lower.contains("tall") || lower.contains("height") {
        if let Some(height) = building.tag("height").and_then(parse_height) {
            return format!("{name} is {} meters tall.", format_meters(height));
        }
        if let Some(levels) = building.tag("building:levels") {
            return format!("{name} has {levels} floors.");
        }
        return format!("I don't have height information for {name}.");
    }

    if ["built", "year", "old"].iter().any(|word| lower.contains(word)) {
        return match building.tag("start_date") {
            Some(date) => format!("{name} was built in {date}."),
            None => format!("I don't have construction date information for {name}."),
        };
    }

    format!("I found {name}, but I don't have specific information to answer your question.")
}

fn format_meters(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
