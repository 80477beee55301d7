//! Deterministic keyword intent parser.
//!
//! Produces the same `Intent` shape as the remote parser so the router never
//! needs to know which one classified a query. Checks run in a fixed order
//! and the first match wins.

use crate::intent::{
    Action, BuildingAttributes, CameraSettings, Intent, Pitch, QuestionContext, SortBy,
    TimePreset, TimeSettings, WeatherKind, WeatherSettings, DEFAULT_RESULT_LIMIT,
};

static RAIN_TERMS: &[&str] = &["rain", "rainy", "raining"];
static SNOW_TERMS: &[&str] = &["snow", "snowy", "snowing"];
static CLEAR_TERMS: &[&str] = &["clear weather", "stop rain", "sunny", "clear sky"];

static NIGHT_TERMS: &[&str] = &["night", "dark", "evening", "nite"];
static DAY_TERMS: &[&str] = &["day", "daytime", "morning", "bright"];

static TOP_DOWN_TERMS: &[&str] = &["from above", "top down", "bird's eye", "aerial", "overhead"];

static DELETE_TERMS: &[&str] = &["delete", "remove", "erase"];
static DELETE_FILLER_PREFIXES: &[&str] = &["the", "this", "that", "building at", "building"];

static QUESTION_WORDS: &[&str] = &["how", "what", "when", "who", "why", "is", "are", "does", "do", "can"];
static KNOWN_LANDMARKS: &[(&str, &str)] = &[
    ("cn tower", "CN Tower"),
    ("eiffel tower", "Eiffel Tower"),
    ("empire state", "Empire State"),
    ("burj khalifa", "Burj Khalifa"),
    ("big ben", "Big Ben"),
];

static NAVIGATION_PHRASES: &[&str] = &["take me to", "go to", "navigate to", "fly to"];
static RANKING_WORDS: &[&str] = &["tallest", "biggest", "underdeveloped"];

static HEIGHT_TERMS: &[&str] = &["tallest", "tall", "highest", "height"];
static AREA_TERMS: &[&str] = &["biggest", "largest", "footprint", "area"];
static UNDERDEVELOPED_TERMS: &[&str] = &["underdeveloped", "low-rise", "short building"];

static PLACE_PREPOSITIONS: &[&str] = &[" in ", " near ", " around "];

const ZOOM_STEP: f64 = 2.0;
const TILT_PITCH_DEG: f64 = 60.0;

/// Lower-cased query with punctuation folded to single spaces and padded, so
/// `" term "` matches whole words and phrases only.
struct Normalized {
    lower: String,
    padded: String,
}

impl Normalized {
    fn new(query: &str) -> Self {
        let lower = query.trim().to_lowercase();
        let words: String = lower
            .chars()
            .map(|ch| {
                if is_word_char(ch) {
                    ch
                } else {
                    ' '
                }
            })
            .collect();
        let padded = format!(" {} ", words.split_whitespace().collect::<Vec<_>>().join(" "));
        Self { lower, padded }
    }

    fn has(&self, term: &str) -> bool {
        self.padded.contains(&format!(" {term} "))
    }

    fn has_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|term| self.has(term))
    }

    fn first_word(&self) -> Option<&str> {
        self.padded.split_whitespace().next()
    }

    /// Original text after the first whole-word occurrence of `term`.
    fn after(&self, term: &str) -> Option<&str> {
        self.lower.match_indices(term).find_map(|(idx, _)| {
            let end = idx + term.len();
            let starts_word = !self.lower[..idx].chars().next_back().is_some_and(is_word_char);
            let ends_word = !self.lower[end..].chars().next().is_some_and(is_word_char);
            (starts_word && ends_word).then(|| &self.lower[end..])
        })
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '\'' || ch == '-'
}

/// Classify `query` without any remote service.
pub fn parse_keywords(query: &str) -> Intent {
    let text = Normalized::new(query);

    if let Some(intent) = weather_intent(&text) {
        return intent;
    }
    if let Some(intent) = time_intent(&text) {
        return intent;
    }
    if let Some(intent) = camera_intent(&text) {
        return intent;
    }
    if text.has_any(DELETE_TERMS) {
        return Intent {
            location_query: delete_location(&text),
            reasoning: Some("Keyword match: delete".to_string()),
            ..Intent::new(Action::DeleteBuilding)
        };
    }
    if text.first_word().is_some_and(|word| QUESTION_WORDS.contains(&word)) {
        let target_name = KNOWN_LANDMARKS
            .iter()
            .find(|(needle, _)| text.has(needle))
            .map(|(_, display)| display.to_string());
        return Intent {
            question_context: Some(QuestionContext {
                subject: Some("general".to_string()),
                target_name,
            }),
            reasoning: Some("Keyword match: question".to_string()),
            ..Intent::new(Action::Question)
        };
    }
    if let Some(intent) = navigation_intent(&text) {
        return intent;
    }
    if let Some(sort_by) = ranking_criterion(&text) {
        return Intent {
            location_query: trailing_place(&text.lower),
            building_attributes: Some(BuildingAttributes {
                sort_by: Some(sort_by),
                building_type: Some("any".to_string()),
                limit: Some(DEFAULT_RESULT_LIMIT),
            }),
            reasoning: Some(format!("Keyword match: building search by {sort_by:?}")),
            ..Intent::new(Action::FindBuilding)
        };
    }

    Intent {
        reasoning: Some("Keyword match: none, exploring area".to_string()),
        ..Intent::new(Action::SearchArea)
    }
}

fn weather_intent(text: &Normalized) -> Option<Intent> {
    let kind = if text.has_any(RAIN_TERMS) {
        WeatherKind::Rain
    } else if text.has_any(SNOW_TERMS) {
        WeatherKind::Snow
    } else if text.has_any(CLEAR_TERMS) {
        WeatherKind::Clear
    } else {
        return None;
    };
    Some(Intent {
        weather_settings: Some(WeatherSettings { kind }),
        reasoning: Some(format!("Keyword match: weather {kind:?}")),
        ..Intent::new(Action::SetWeather)
    })
}

fn time_intent(text: &Normalized) -> Option<Intent> {
    let preset = if text.has_any(NIGHT_TERMS) {
        TimePreset::Night
    } else if text.has_any(DAY_TERMS) && !text.has("what") {
        TimePreset::Day
    } else {
        return None;
    };
    Some(Intent {
        time_settings: Some(TimeSettings { preset }),
        reasoning: Some(format!("Keyword match: time {preset:?}")),
        ..Intent::new(Action::SetTime)
    })
}

fn camera_intent(text: &Normalized) -> Option<Intent> {
    let camera = if text.has("zoom in") {
        CameraSettings {
            zoom_delta: Some(ZOOM_STEP),
            ..CameraSettings::default()
        }
    } else if text.has("zoom out") {
        CameraSettings {
            zoom_delta: Some(-ZOOM_STEP),
            ..CameraSettings::default()
        }
    } else if text.has_any(TOP_DOWN_TERMS) {
        CameraSettings {
            pitch: Some(Pitch::Degrees(0.0)),
            ..CameraSettings::default()
        }
    } else if text.has("tilt") {
        CameraSettings {
            pitch: Some(Pitch::Degrees(TILT_PITCH_DEG)),
            ..CameraSettings::default()
        }
    } else {
        return None;
    };
    Some(Intent {
        camera_settings: Some(camera),
        reasoning: Some("Keyword match: camera".to_string()),
        ..Intent::new(Action::CameraControl)
    })
}

/// Text after the first delete keyword, minus leading filler words.
fn delete_location(text: &Normalized) -> Option<String> {
    for term in DELETE_TERMS {
        let Some(rest) = text.after(term) else {
            continue;
        };
        let mut location = rest.trim();
        for prefix in DELETE_FILLER_PREFIXES {
            location = strip_leading_words(location, prefix);
        }
        let location = trim_punctuation(location);
        if !location.is_empty() {
            return Some(location.to_string());
        }
    }
    None
}

fn navigation_intent(text: &Normalized) -> Option<Intent> {
    for phrase in NAVIGATION_PHRASES {
        let Some(rest) = text.after(phrase) else {
            continue;
        };
        let location = trim_punctuation(rest);
        if RANKING_WORDS.iter().any(|word| location.contains(word)) {
            // "take me to the tallest building" is a building search.
            return None;
        }
        return Some(Intent {
            location_query: Some(location.to_string()).filter(|value| !value.is_empty()),
            reasoning: Some(format!("Keyword match: navigation phrase '{phrase}'")),
            ..Intent::new(Action::Navigate)
        });
    }
    None
}

fn ranking_criterion(text: &Normalized) -> Option<SortBy> {
    if text.has_any(HEIGHT_TERMS) {
        Some(SortBy::Height)
    } else if text.has_any(AREA_TERMS) {
        Some(SortBy::Area)
    } else if text.has_any(UNDERDEVELOPED_TERMS) {
        Some(SortBy::Underdeveloped)
    } else {
        None
    }
}

/// Place named after the last "in"/"near"/"around", e.g. "tallest building in toronto".
fn trailing_place(lower: &str) -> Option<String> {
    PLACE_PREPOSITIONS
        .iter()
        .filter_map(|prep| lower.rfind(prep).map(|idx| &lower[idx + prep.len()..]))
        .map(trim_punctuation)
        .filter(|place| !place.is_empty() && !is_relative_place(place))
        .min_by_key(|place| place.len())
        .map(str::to_string)
}

fn is_relative_place(place: &str) -> bool {
    matches!(
        place,
        "here" | "this area" | "the area" | "view" | "this view" | "me" | "the map"
    )
}

/// Removes `prefix` when it is a whole leading word (or words) of `text`.
fn strip_leading_words<'a>(text: &'a str, prefix: &str) -> &'a str {
    match text.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => text,
    }
}

fn trim_punctuation(text: &str) -> &str {
    text.trim()
        .trim_end_matches(['?', '!', '.'])
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_keywords() {
        let intent = parse_keywords("make it rain");
        assert_eq!(intent.action, Action::SetWeather);
        assert_eq!(intent.weather_settings.unwrap().kind, WeatherKind::Rain);

        let intent = parse_keywords("Is it snowing?");
        assert_eq!(intent.weather_settings.unwrap().kind, WeatherKind::Snow);

        let intent = parse_keywords("clear sky please");
        assert_eq!(intent.weather_settings.unwrap().kind, WeatherKind::Clear);
    }

    #[test]
    fn rain_inside_a_place_name_is_not_weather() {
        let intent = parse_keywords("take me to Bahrain");
        assert_eq!(intent.action, Action::Navigate);
        assert_eq!(intent.location(), Some("bahrain"));
    }

    #[test]
    fn time_keywords() {
        assert_eq!(
            parse_keywords("nite mode").time_settings.unwrap().preset,
            TimePreset::Night
        );
        assert_eq!(
            parse_keywords("switch to daytime").time_settings.unwrap().preset,
            TimePreset::Day
        );
        // "what" questions about the day are not time control.
        assert_eq!(parse_keywords("what day was it built").action, Action::Question);
    }

    #[test]
    fn camera_keywords() {
        let zoom_in = parse_keywords("zoom in").camera_settings.unwrap();
        assert_eq!(zoom_in.zoom_delta, Some(2.0));

        let zoom_out = parse_keywords("Zoom out a bit").camera_settings.unwrap();
        assert_eq!(zoom_out.zoom_delta, Some(-2.0));

        let above = parse_keywords("show me from above").camera_settings.unwrap();
        assert_eq!(above.pitch, Some(Pitch::Degrees(0.0)));

        let tilt = parse_keywords("tilt the view").camera_settings.unwrap();
        assert_eq!(tilt.pitch, Some(Pitch::Degrees(60.0)));
    }

    #[test]
    fn delete_extracts_location() {
        let intent = parse_keywords("delete the CN Tower");
        assert_eq!(intent.action, Action::DeleteBuilding);
        assert_eq!(intent.location(), Some("cn tower"));

        let intent = parse_keywords("remove the building at 123 Main St");
        assert_eq!(intent.location(), Some("123 main st"));

        let intent = parse_keywords("erase the theatre royal");
        assert_eq!(intent.location(), Some("theatre royal"));

        let intent = parse_keywords("delete");
        assert_eq!(intent.action, Action::DeleteBuilding);
        assert_eq!(intent.location(), None);
    }

    #[test]
    fn question_words_lead() {
        let intent = parse_keywords("How tall is the CN Tower?");
        assert_eq!(intent.action, Action::Question);
        assert_eq!(intent.target_name(), Some("CN Tower"));

        let intent = parse_keywords("who designed this");
        assert_eq!(intent.action, Action::Question);
        assert_eq!(intent.target_name(), None);
    }

    #[test]
    fn navigation_phrases() {
        let intent = parse_keywords("Take me to Paris");
        assert_eq!(intent.action, Action::Navigate);
        assert_eq!(intent.location(), Some("paris"));

        let intent = parse_keywords("fly to anqing, anhui.");
        assert_eq!(intent.location(), Some("anqing, anhui"));
    }

    #[test]
    fn phrases_inside_words_do_not_match() {
        let intent = parse_keywords("biggest building by Chicago Tower");
        assert_eq!(intent.action, Action::FindBuilding);
        assert_eq!(intent.sort_by(), SortBy::Area);

        let intent = parse_keywords("remove the Deleted Scenes Cinema");
        assert_eq!(intent.action, Action::DeleteBuilding);
        assert_eq!(intent.location(), Some("deleted scenes cinema"));
    }

    #[test]
    fn navigation_bails_out_for_ranking_queries() {
        let intent = parse_keywords("take me to the tallest building in Toronto");
        assert_eq!(intent.action, Action::FindBuilding);
        assert_eq!(intent.sort_by(), SortBy::Height);
        assert_eq!(intent.location(), Some("toronto"));
    }

    #[test]
    fn ranking_keywords() {
        assert_eq!(parse_keywords("highest tower").sort_by(), SortBy::Height);
        assert_eq!(parse_keywords("largest footprint").sort_by(), SortBy::Area);
        assert_eq!(parse_keywords("find low-rise lots").sort_by(), SortBy::Underdeveloped);
        assert_eq!(parse_keywords("underdeveloped parcels").sort_by(), SortBy::Underdeveloped);

        let intent = parse_keywords("biggest building near here");
        assert_eq!(intent.action, Action::FindBuilding);
        assert_eq!(intent.location(), None);
        assert_eq!(intent.limit(), 5);
    }

    #[test]
    fn anything_else_explores_the_area() {
        let intent = parse_keywords("show me some buildings");
        assert_eq!(intent.action, Action::SearchArea);
        assert_eq!(intent.location(), None);
    }
}
