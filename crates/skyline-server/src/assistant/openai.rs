//! OpenAI chat-completions adapter.

use super::prompts::{ANSWER_SYSTEM_PROMPT, INTENT_SYSTEM_PROMPT, QA_SYSTEM_PROMPT};
use super::{AnswerGenerator, AssistantError, IntentParser, LocalAssistant, QaGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use skyline_core::{BuildingFeature, Intent, QuestionContext};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Sampling settings for one kind of call.
#[derive(Debug, Clone, Copy)]
struct Sampling {
    temperature: f32,
    max_tokens: u32,
    json: bool,
}

const INTENT_SAMPLING: Sampling = Sampling {
    temperature: 0.3,
    max_tokens: 300,
    json: true,
};
const ANSWER_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 100,
    json: false,
};
const QA_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 200,
    json: false,
};

/// Remote parser and answer generator; every failure falls back to
/// [`LocalAssistant`].
#[derive(Debug, Clone)]
pub struct OpenAiAssistant {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    fallback: LocalAssistant,
}

impl OpenAiAssistant {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
            fallback: LocalAssistant,
        }
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        sampling: Sampling,
    ) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            response_format: sampling.json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AssistantError::EmptyResponse)
    }

    async fn parse_remote(&self, query: &str) -> Result<Intent, AssistantError> {
        let user = format!("Parse this search query: {query}");
        let content = self.complete(INTENT_SYSTEM_PROMPT, &user, INTENT_SAMPLING).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn properties_json(feature: Option<&BuildingFeature>) -> Option<String> {
    feature
        .filter(|feature| !feature.properties.is_empty())
        .and_then(|feature| serde_json::to_string_pretty(&feature.properties).ok())
}

#[async_trait]
impl IntentParser for OpenAiAssistant {
    async fn parse(&self, query: &str) -> Intent {
        match self.parse_remote(query).await {
            Ok(intent) => intent,
            Err(err) => {
                tracing::warn!("OpenAI intent parsing failed, using keyword parser: {}", err);
                self.fallback.parse(query).await
            }
        }
    }
}

#[async_trait]
impl AnswerGenerator for OpenAiAssistant {
    async fn generate(
        &self,
        query: &str,
        top: Option<&BuildingFeature>,
        location_name: Option<&str>,
        intent: &Intent,
    ) -> String {
        let location = location_name.unwrap_or("current viewport");
        let context = match top {
            Some(_) => {
                let props = properties_json(top).unwrap_or_else(|| "{}".to_string());
                let intent = serde_json::to_string(intent).unwrap_or_else(|_| "unknown".to_string());
                format!(
                    "Query: {query}\nLocation: {location}\nTop result properties: {props}\nIntent: {intent}"
                )
            }
            None => format!("Query: {query}\nLocation: {location}\nResult: No buildings found."),
        };

        match self.complete(ANSWER_SYSTEM_PROMPT, &context, ANSWER_SAMPLING).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!("OpenAI answer generation failed, using template: {}", err);
                self.fallback.generate(query, top, location_name, intent).await
            }
        }
    }
}

#[async_trait]
impl QaGenerator for OpenAiAssistant {
    async fn answer(
        &self,
        query: &str,
        building: Option<&BuildingFeature>,
        context: Option<&QuestionContext>,
    ) -> String {
        let building_data =
            properties_json(building).unwrap_or_else(|| "No building data available".to_string());
        let question_context = context
            .and_then(|ctx| serde_json::to_string(ctx).ok())
            .unwrap_or_else(|| "None".to_string());
        let prompt = format!(
            "Question: {query}\nBuilding data: {building_data}\nQuestion context: {question_context}"
        );

        match self.complete(QA_SYSTEM_PROMPT, &prompt, QA_SAMPLING).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!("OpenAI question answering failed, using template: {}", err);
                self.fallback.answer(query, building, context).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use skyline_core::{Action, SortBy, TagMap, WeatherKind};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn completion(content: &str) -> Value {
        json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]})
    }

    fn assistant(base_url: &str) -> OpenAiAssistant {
        OpenAiAssistant::new(base_url, "sk-test", "gpt-4o", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn parses_model_intent() {
        let base = spawn(Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["model"], "gpt-4o");
                assert_eq!(body["response_format"]["type"], "json_object");
                assert_eq!(body["max_tokens"], 300);
                assert_eq!(
                    body["messages"][1]["content"],
                    "Parse this search query: tallest building in toronto"
                );
                Json(completion(
                    r#"{"action": "find_building", "location_query": "Toronto",
                        "building_attributes": {"sort_by": "height", "building_type": "any", "limit": 3},
                        "reasoning": "ranking by height"}"#,
                ))
            }),
        ))
        .await;

        let intent = assistant(&base).parse("tallest building in toronto").await;
        assert_eq!(intent.action, Action::FindBuilding);
        assert_eq!(intent.location(), Some("Toronto"));
        assert_eq!(intent.sort_by(), SortBy::Height);
        assert_eq!(intent.limit(), 3);
    }

    #[tokio::test]
    async fn upstream_error_falls_back_to_keywords() {
        let base = spawn(Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        ))
        .await;

        let intent = assistant(&base).parse("make it rain").await;
        assert_eq!(intent.action, Action::SetWeather);
        assert_eq!(intent.weather_settings.unwrap().kind, WeatherKind::Rain);
    }

    #[tokio::test]
    async fn non_json_content_falls_back_to_keywords() {
        let base = spawn(Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(completion("Sure! You want night mode.")) }),
        ))
        .await;

        let intent = assistant(&base).parse("switch to night").await;
        assert_eq!(intent.action, Action::SetTime);
    }

    #[tokio::test]
    async fn answers_use_model_text() {
        let base = spawn(Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert!(body.get("response_format").is_none());
                assert_eq!(body["max_tokens"], 100);
                let user = body["messages"][1]["content"].as_str().unwrap().to_string();
                assert!(user.contains("Location: Toronto"));
                assert!(user.contains("First Canadian Place"));
                Json(completion("  First Canadian Place is the tallest office tower.  "))
            }),
        ))
        .await;

        let mut tags = TagMap::new();
        tags.insert("name".to_string(), "First Canadian Place".to_string());
        let top = BuildingFeature::square(Some(1), [-79.38, 43.65], 0.0003, tags);
        let answer = assistant(&base)
            .generate("tallest", Some(&top), Some("Toronto"), &Intent::new(Action::FindBuilding))
            .await;
        assert_eq!(answer, "First Canadian Place is the tallest office tower.");
    }

    #[tokio::test]
    async fn unreachable_model_uses_templates() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v1", listener.local_addr().unwrap());
        drop(listener);
        let remote = assistant(&base);

        let answer = remote
            .generate("tallest", None, Some("Toronto"), &Intent::new(Action::FindBuilding))
            .await;
        assert_eq!(answer, "No buildings found near Toronto.");

        let qa = remote.answer("how tall is it", None, None).await;
        assert_eq!(qa, "I don't have enough information to answer that question.");
    }
}
