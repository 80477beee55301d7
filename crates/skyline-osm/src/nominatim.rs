//! Forward geocoding through the Nominatim search API.

use crate::error::FetchError;
use crate::source::LocationResolver;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use skyline_core::ResolvedLocation;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "skyline-search/0.1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Address keys naming the feature itself, in preference order.
const FEATURE_KEYS: &[&str] = &["tourism", "building", "amenity", "man_made", "leisure", "shop"];
const CITY_KEYS: &[&str] = &["city", "town", "village", "municipality"];
/// Display-name parts that are regions rather than cities.
const REGION_NAMES: &[&str] = &[
    "ontario",
    "quebec",
    "british columbia",
    "alberta",
    "golden horseshoe",
    "greater toronto area",
];

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    class: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    boundingbox: Option<Vec<String>>,
    #[serde(default)]
    address: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct NominatimResolver {
    client: Client,
    url: String,
    user_agent: String,
    timeout: Duration,
}

impl NominatimResolver {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    async fn lookup(&self, name: &str) -> Result<Option<ResolvedLocation>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("q", name),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .map_err(|err| FetchError::transport(&self.url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: self.url.clone(),
                status,
            });
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|err| FetchError::decode(&self.url, err.to_string()))?;

        match places.into_iter().next() {
            Some(place) => into_location(place, name, &self.url).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for NominatimResolver {
    fn default() -> Self {
        Self::new(DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    async fn resolve(&self, name: &str) -> Option<ResolvedLocation> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        match self.lookup(name).await {
            Ok(Some(location)) => {
                tracing::debug!(
                    query = %name,
                    display_name = %location.display_name,
                    location_type = %location.location_type,
                    "Resolved location"
                );
                Some(location)
            }
            Ok(None) => {
                tracing::debug!(query = %name, "No location match");
                None
            }
            Err(err) => {
                tracing::warn!("Geocoding '{}' failed: {}", name, err);
                None
            }
        }
    }
}

fn into_location(
    place: NominatimPlace,
    query: &str,
    endpoint: &str,
) -> Result<ResolvedLocation, FetchError> {
    let parse = |raw: &str| {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| FetchError::decode(endpoint, format!("bad coordinate '{raw}'")))
    };
    let lat = parse(&place.lat)?;
    let lon = parse(&place.lon)?;

    let bounding_box = place.boundingbox.as_deref().and_then(|raw| {
        let values: Vec<f64> = raw.iter().filter_map(|v| v.trim().parse().ok()).collect();
        <[f64; 4]>::try_from(values).ok()
    });

    let full_name = place.display_name.as_deref().unwrap_or(query);
    let address = (!place.address.is_empty()).then_some(&place.address);

    Ok(ResolvedLocation {
        lat,
        lon,
        display_name: shorten_display_name(full_name, address),
        location_type: location_type(&place.class, &place.kind),
        bounding_box,
    })
}

/// Coarse location type from Nominatim's `class` and `type`.
fn location_type(class: &str, kind: &str) -> String {
    let mapped = match class {
        "boundary" if kind == "administrative" => "city",
        "building" => "building",
        "amenity" => "landmark",
        "tourism" | "man_made" => "poi",
        "place" => "place",
        _ if kind.is_empty() => "unknown",
        _ => kind,
    };
    mapped.to_string()
}

/// Trims Nominatim's long display names to "name, city, country".
///
/// Address details win when they name at least two of feature, city and
/// country. Otherwise the comma-separated name keeps its first part, the first
/// following part that looks like a city (no digits, not a known region) and
/// the last part. Names with three or fewer parts are returned unchanged.
pub fn shorten_display_name(full_name: &str, address: Option<&BTreeMap<String, String>>) -> String {
    if full_name.is_empty() {
        return String::new();
    }

    if let Some(address) = address {
        let first_of = |keys: &[&str]| keys.iter().find_map(|key| address.get(*key)).cloned();
        let parts: Vec<String> = [
            first_of(FEATURE_KEYS),
            first_of(CITY_KEYS),
            address.get("country").cloned(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.len() >= 2 {
            return parts.join(", ");
        }
    }

    let parts: Vec<&str> = full_name.split(',').map(str::trim).collect();
    if parts.len() <= 3 {
        return full_name.to_string();
    }

    let mut kept = vec![parts[0]];
    let city = parts[1..parts.len().min(6)].iter().find(|part| {
        !part.chars().any(|ch| ch.is_ascii_digit())
            && !REGION_NAMES.contains(&part.to_lowercase().as_str())
    });
    if let Some(city) = city {
        kept.push(*city);
    }
    if let Some(&country) = parts.last() {
        if !kept.contains(&country) {
            kept.push(country);
        }
    }
    kept.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/search")
    }

    fn address(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn address_details_shorten_name() {
        let details = address(&[
            ("tourism", "CN Tower"),
            ("road", "Bremner Boulevard"),
            ("city", "Toronto"),
            ("state", "Ontario"),
            ("country", "Canada"),
        ]);
        assert_eq!(
            shorten_display_name("CN Tower, 290, Bremner Boulevard, Toronto, Ontario, Canada", Some(&details)),
            "CN Tower, Toronto, Canada"
        );
    }

    #[test]
    fn comma_split_skips_regions_and_numbers() {
        assert_eq!(
            shorten_display_name("Toronto, Golden Horseshoe, Ontario, Canada", None),
            "Toronto, Canada"
        );
        assert_eq!(
            shorten_display_name("Old City Hall, 60, Queen Street West, Toronto, Canada", None),
            "Old City Hall, Queen Street West, Canada"
        );
        // Too few details to build from; falls through to the comma split.
        let country_only = address(&[("country", "France")]);
        assert_eq!(
            shorten_display_name("Paris, Île-de-France, France métropolitaine, France", Some(&country_only)),
            "Paris, Île-de-France, France"
        );
    }

    #[test]
    fn short_names_are_unchanged() {
        assert_eq!(shorten_display_name("Paris, France", None), "Paris, France");
        assert_eq!(shorten_display_name("", None), "");
    }

    #[test]
    fn class_and_type_mapping() {
        assert_eq!(location_type("boundary", "administrative"), "city");
        assert_eq!(location_type("boundary", "national_park"), "national_park");
        assert_eq!(location_type("building", "yes"), "building");
        assert_eq!(location_type("amenity", "university"), "landmark");
        assert_eq!(location_type("tourism", "attraction"), "poi");
        assert_eq!(location_type("man_made", "tower"), "poi");
        assert_eq!(location_type("place", "city"), "place");
        assert_eq!(location_type("highway", "residential"), "residential");
        assert_eq!(location_type("", ""), "unknown");
    }

    #[tokio::test]
    async fn resolves_first_result() {
        let url = spawn(Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                assert_eq!(params["q"], "CN Tower");
                assert_eq!(params["format"], "json");
                assert_eq!(params["limit"], "1");
                assert_eq!(params["addressdetails"], "1");
                assert_eq!(headers["user-agent"], "skyline-test/1.0");
                Json(json!([{
                    "lat": "43.6425701",
                    "lon": "-79.3870569",
                    "display_name": "CN Tower, 290, Bremner Boulevard, Toronto, Ontario, M5V 3L9, Canada",
                    "class": "man_made",
                    "type": "tower",
                    "boundingbox": ["43.6423", "43.6428", "-79.3873", "-79.3868"],
                    "address": {"man_made": "CN Tower", "city": "Toronto", "country": "Canada"}
                }]))
            }),
        ))
        .await;
        let resolver = NominatimResolver::new(url, "skyline-test/1.0", Duration::from_secs(5));

        let location = resolver.resolve("  CN Tower ").await.unwrap();
        assert!((location.lat - 43.6425701).abs() < 1e-9);
        assert!((location.lon + 79.3870569).abs() < 1e-9);
        assert_eq!(location.display_name, "CN Tower, Toronto, Canada");
        assert_eq!(location.location_type, "poi");
        assert_eq!(
            location.bounding_box,
            Some([43.6423, 43.6428, -79.3873, -79.3868])
        );
        assert_eq!(location.zoom_level(), 15);
    }

    #[tokio::test]
    async fn no_match_is_none() {
        let url = spawn(Router::new().route("/search", get(|| async { Json(json!([])) }))).await;
        let resolver = NominatimResolver::new(url, DEFAULT_USER_AGENT, Duration::from_secs(5));
        assert!(resolver.resolve("Nowhere at all").await.is_none());
    }

    #[tokio::test]
    async fn upstream_failure_is_none() {
        let url = spawn(Router::new().route(
            "/search",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        ))
        .await;
        let resolver = NominatimResolver::new(url, DEFAULT_USER_AGENT, Duration::from_secs(5));
        assert!(resolver.resolve("Toronto").await.is_none());
    }

    #[tokio::test]
    async fn bad_coordinates_are_none() {
        let url = spawn(Router::new().route(
            "/search",
            get(|| async { Json(json!([{"lat": "north", "lon": "-79.0", "class": "place", "type": "city"}])) }),
        ))
        .await;
        let resolver = NominatimResolver::new(url, DEFAULT_USER_AGENT, Duration::from_secs(5));
        assert!(resolver.resolve("Toronto").await.is_none());
    }

    #[tokio::test]
    async fn blank_name_skips_lookup() {
        let resolver = NominatimResolver::new("http://127.0.0.1:9/search", DEFAULT_USER_AGENT, Duration::from_millis(100));
        assert!(resolver.resolve("   ").await.is_none());
    }
}
