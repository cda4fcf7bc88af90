use std::sync::Arc;

use ai_client::{strip_code_blocks, ImageAgent, OpenAi, StructuredOutput, TextAgent};
use async_trait::async_trait;
use lectern_common::{AppConfig, Flashcard, Language, LecternError, SearchResult, Soft};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

use crate::prompts;
use crate::traits::ContentService;

/// Root object requested from the provider; strict JSON mode wants an object
/// at the top level, not a bare array.
#[derive(Debug, Deserialize, JsonSchema)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct FlashcardDraft {
    /// A concise, clear question based on the text, for the front of the card.
    front: String,
    /// The direct, precise answer to the question, taken or inferred from the text.
    back: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    /// How many results to ask for. Not enforced on the response.
    pub result_count: usize,
    /// Language the provider writes result texts in.
    pub result_language: Language,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            result_count: 10,
            result_language: Language::En,
        }
    }
}

impl From<&AppConfig> for SearchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            result_count: config.result_count,
            result_language: config.result_language,
        }
    }
}

/// [`ContentService`] backed by an OpenAI-compatible provider.
#[derive(Clone)]
pub struct AiContentService {
    text: Arc<dyn TextAgent>,
    images: Arc<dyn ImageAgent>,
    settings: SearchSettings,
}

impl AiContentService {
    pub fn new(
        text: Arc<dyn TextAgent>,
        images: Arc<dyn ImageAgent>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            text,
            images,
            settings,
        }
    }

    pub fn from_openai(ai: Arc<OpenAi>, settings: SearchSettings) -> Self {
        Self::new(ai.clone(), ai, settings)
    }

    async fn extract<T: StructuredOutput>(&self, system: &str, user: &str) -> anyhow::Result<T> {
        let json = self
            .text
            .structured_output(system, user, T::openai_schema())
            .await?;
        Ok(serde_json::from_str(strip_code_blocks(&json))?)
    }
}

#[async_trait]
impl ContentService for AiContentService {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LecternError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LecternError::SearchFailed("query is empty".into()));
        }

        info!(query, "Performing search");

        let prompt = prompts::search_prompt(
            query,
            self.settings.result_count,
            self.settings.result_language,
        );
        match self
            .extract::<SearchResponse>(prompts::SEARCH_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(response) => {
                info!(query, results = response.results.len(), "Search completed");
                Ok(response.results)
            }
            Err(e) => {
                warn!(error = %e, query, "Search request failed");
                Err(LecternError::SearchFailed(e.to_string()))
            }
        }
    }

    async fn translate(&self, text: &str, language: Language) -> Soft<String> {
        let system = prompts::translation_system_prompt(language);

        match self.text.chat_completion(&system, text).await {
            Ok(translated) => Soft::Ok(translated.trim().to_string()),
            Err(e) => {
                warn!(
                    error = %e,
                    language = %language,
                    "Translation failed, returning marked original"
                );
                Soft::degraded(prompts::failed_translation(text), e.to_string())
            }
        }
    }

    async fn make_flashcard(&self, text: &str, image: &str) -> Soft<Flashcard> {
        let draft = self
            .extract::<FlashcardDraft>(prompts::FLASHCARD_SYSTEM_PROMPT, &prompts::flashcard_prompt(text))
            .await
            .and_then(|draft| {
                if draft.front.trim().is_empty() || draft.back.trim().is_empty() {
                    anyhow::bail!("flashcard draft has an empty side");
                }
                Ok(draft)
            });

        match draft {
            Ok(draft) => Soft::Ok(Flashcard {
                front: draft.front,
                back: draft.back,
                thumbnail: image.to_string(),
            }),
            Err(e) => {
                warn!(error = %e, "Flashcard generation failed, using fallback card");
                Soft::degraded(prompts::fallback_flashcard(text, image), e.to_string())
            }
        }
    }

    async fn make_image(&self, prompt: &str) -> Result<String, LecternError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(LecternError::ImageGenerationFailed("prompt is empty".into()));
        }

        match self.images.generate_image(prompt).await {
            Ok(reference) => {
                info!(prompt, "Image generated");
                Ok(reference)
            }
            Err(e) => {
                warn!(error = %e, prompt, "Image generation failed");
                Err(LecternError::ImageGenerationFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedAgent;

    fn service(agent: ScriptedAgent) -> (AiContentService, Arc<ScriptedAgent>) {
        let agent = Arc::new(agent);
        let service = AiContentService::new(agent.clone(), agent.clone(), SearchSettings::default());
        (service, agent)
    }

    #[tokio::test]
    async fn search_parses_structured_results() {
        let body = serde_json::json!({
            "results": [{
                "id": "doc1",
                "title": "Black holes",
                "source": "arXiv",
                "type": "document",
                "certification": "verified",
                "snippet": "An overview",
                "content": {
                    "data": "Black holes are...",
                    "image": "https://img.example/bh.png",
                    "full": "https://arxiv.org/pdf/1234.pdf"
                }
            }]
        });
        let (service, agent) = service(ScriptedAgent::new().structured(&format!("```json\n{body}\n```")));

        let results = service.search("black holes").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "doc1");
        let schema = agent.last_schema().unwrap();
        assert_eq!(schema["properties"]["results"]["type"], "array");
    }

    #[tokio::test]
    async fn blank_search_never_calls_provider() {
        let (service, agent) = service(ScriptedAgent::new());
        let err = service.search("   ").await.unwrap_err();
        assert!(matches!(err, LecternError::SearchFailed(_)));
        assert_eq!(agent.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_search_response_fails() {
        let (service, _) = service(ScriptedAgent::new().structured("not json"));
        assert!(matches!(
            service.search("foxes").await,
            Err(LecternError::SearchFailed(_))
        ));
    }

    #[tokio::test]
    async fn translation_success_is_trimmed() {
        let (service, _) = service(ScriptedAgent::new().chat("  Bonjour \n"));
        assert_eq!(
            service.translate("Hello", Language::Fr).await,
            Soft::Ok("Bonjour".to_string())
        );
    }

    #[tokio::test]
    async fn translation_failure_degrades_with_marker() {
        let (service, _) = service(ScriptedAgent::new());
        let soft = service.translate("Hello", Language::De).await;
        assert!(soft.is_degraded());
        assert_eq!(soft.as_str(), "[TRANSLATION FAILED] Hello");
    }

    #[tokio::test]
    async fn flashcard_uses_given_thumbnail() {
        let (service, _) =
            service(ScriptedAgent::new().structured(r#"{"front":"Q","back":"A"}"#));
        let card = service.make_flashcard("hello", "https://img.example/x.png").await;
        assert_eq!(
            card,
            Soft::Ok(Flashcard {
                front: "Q".into(),
                back: "A".into(),
                thumbnail: "https://img.example/x.png".into(),
            })
        );
    }

    #[tokio::test]
    async fn flashcard_failure_degrades_to_fallback() {
        let (service, _) = service(ScriptedAgent::new().structured(r#"{"front":"","back":"A"}"#));
        let card = service.make_flashcard("hello world", "img").await;
        assert!(card.is_degraded());
        let card = card.into_value();
        assert_eq!(card.back, "hello world");
        assert!(card.front.contains("\"hello world...\""));
        assert_eq!(card.thumbnail, "img");
    }

    #[tokio::test]
    async fn image_failure_is_hard() {
        let (service, _) = service(ScriptedAgent::new());
        assert!(matches!(
            service.make_image("a red fox").await,
            Err(LecternError::ImageGenerationFailed(_))
        ));
    }

    #[tokio::test]
    async fn blank_image_prompt_never_calls_provider() {
        let (service, agent) = service(ScriptedAgent::new().image("data:image/png;base64,AA=="));
        assert!(service.make_image(" \t").await.is_err());
        assert_eq!(agent.calls(), 0);
        assert_eq!(
            service.make_image("a red fox").await.unwrap(),
            "data:image/png;base64,AA=="
        );
    }
}
