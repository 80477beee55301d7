use super::{AnswerGenerator, IntentParser, QaGenerator};
use async_trait::async_trait;
use skyline_core::{answers, keywords, BuildingFeature, Intent, QuestionContext};

/// Keyword parser plus template answers. No network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAssistant;

#[async_trait]
impl IntentParser for LocalAssistant {
    async fn parse(&self, query: &str) -> Intent {
        keywords::parse_keywords(query)
    }
}

#[async_trait]
impl AnswerGenerator for LocalAssistant {
    async fn generate(
        &self,
        _query: &str,
        top: Option<&BuildingFeature>,
        location_name: Option<&str>,
        intent: &Intent,
    ) -> String {
        answers::search_answer(top, location_name, Some(intent))
    }
}

#[async_trait]
impl QaGenerator for LocalAssistant {
    async fn answer(
        &self,
        query: &str,
        building: Option<&BuildingFeature>,
        context: Option<&QuestionContext>,
    ) -> String {
        answers::qa_answer(query, building, context)
    }
}
