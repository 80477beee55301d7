use thiserror::Error;

/// Failure of a single outbound attempt. Callers log it and degrade; it never
/// reaches an API response.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl FetchError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn decode(endpoint: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}
