//! Server configuration from environment.

use skyline_osm::{nominatim, overpass};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub overpass_endpoints: Vec<String>,
    pub overpass_timeout: Duration,
    pub nominatim_url: String,
    pub nominatim_user_agent: String,
    pub geocoder_timeout: Duration,
    /// Empty or unset selects the local parser and template answers.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SKYLINE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            overpass_endpoints: env::var("OVERPASS_ENDPOINTS")
                .ok()
                .map(|raw| parse_list(&raw))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(|| {
                    overpass::DEFAULT_OVERPASS_ENDPOINTS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
            overpass_timeout: secs_from_env("OVERPASS_TIMEOUT_S", 20),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| nominatim::DEFAULT_NOMINATIM_URL.to_string()),
            nominatim_user_agent: env::var("NOMINATIM_USER_AGENT")
                .unwrap_or_else(|_| nominatim::DEFAULT_USER_AGENT.to_string()),
            geocoder_timeout: secs_from_env("GEOCODER_TIMEOUT_S", 10),
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            openai_timeout: secs_from_env("OPENAI_TIMEOUT_S", 30),
            log_format: match env::var("SKYLINE_LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }
}

fn secs_from_env(key: &str, default_s: u64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(default_s);
    Duration::from_secs(secs)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_list_parsing() {
        assert_eq!(
            parse_list(" https://a/api , ,https://b/api,"),
            vec!["https://a/api".to_string(), "https://b/api".to_string()]
        );
        assert!(parse_list("  ").is_empty());
    }
}
