//! Language capabilities used by the router: intent parsing, search answers
//! and question answering.
//!
//! Each capability has a remote (OpenAI) and a local implementation. The
//! remote one degrades to the local one on any failure, so callers never see
//! an error from this layer.

pub mod local;
pub mod openai;
mod prompts;

use crate::config::Config;
use async_trait::async_trait;
use skyline_core::{BuildingFeature, Intent, QuestionContext};
use std::sync::Arc;
use thiserror::Error;

pub use local::LocalAssistant;
pub use openai::OpenAiAssistant;

#[async_trait]
pub trait IntentParser: Send + Sync {
    async fn parse(&self, query: &str) -> Intent;
}

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Short prose about a building search result (or its absence).
    async fn generate(
        &self,
        query: &str,
        top: Option<&BuildingFeature>,
        location_name: Option<&str>,
        intent: &Intent,
    ) -> String;
}

#[async_trait]
pub trait QaGenerator: Send + Sync {
    async fn answer(
        &self,
        query: &str,
        building: Option<&BuildingFeature>,
        context: Option<&QuestionContext>,
    ) -> String;
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("chat completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat completion returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("chat completion had no content")]
    EmptyResponse,
    #[error("model output is not a valid intent: {0}")]
    InvalidIntent(#[from] serde_json::Error),
}

/// The three capabilities, shared by every request.
#[derive(Clone)]
pub struct Assistant {
    pub parser: Arc<dyn IntentParser>,
    pub answers: Arc<dyn AnswerGenerator>,
    pub qa: Arc<dyn QaGenerator>,
}

impl Assistant {
    pub fn local() -> Self {
        let local = Arc::new(LocalAssistant);
        Self {
            parser: local.clone(),
            answers: local.clone(),
            qa: local,
        }
    }

    /// OpenAI-backed when an API key is configured, local otherwise.
    pub fn from_config(config: &Config) -> Self {
        match config.openai_api_key.as_deref() {
            Some(api_key) => {
                tracing::info!(model = %config.openai_model, "Using OpenAI assistant");
                let remote = Arc::new(OpenAiAssistant::new(
                    &config.openai_base_url,
                    api_key,
                    &config.openai_model,
                    config.openai_timeout,
                ));
                Self {
                    parser: remote.clone(),
                    answers: remote.clone(),
                    qa: remote,
                }
            }
            None => {
                tracing::info!("OPENAI_API_KEY not set; using keyword parser and template answers");
                Self::local()
            }
        }
    }
}
