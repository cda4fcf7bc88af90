mod client;
pub(crate) mod schema;
pub(crate) mod types;

pub use schema::StructuredOutput;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ImageAgent, TextAgent};

use client::OpenAiClient;
use types::{ChatRequest, ImageRequest, WireMessage};

const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
const MAX_OUTPUT_TOKENS: u32 = 4096;

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    image_model: String,
    base_url: Option<String>,
    http: reqwest::Client,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the chat model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key, self.http.clone());
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    fn temperature_for(&self) -> Option<f32> {
        if self.model.starts_with("gpt-5") {
            None
        } else {
            Some(0.0)
        }
    }
}

// =============================================================================
// Agent Implementations
// =============================================================================

#[async_trait]
impl TextAgent for OpenAi {
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let mut request = ChatRequest::new(&self.model)
            .message(WireMessage::system(system))
            .message(WireMessage::user(user))
            .token_limit(MAX_OUTPUT_TOKENS);
        if let Some(t) = self.temperature_for() {
            request = request.temperature(t);
        }

        self.client().chat(&request).await
    }

    async fn structured_output(
        &self,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String> {
        let mut request = ChatRequest::new(&self.model)
            .message(WireMessage::system(system))
            .message(WireMessage::user(user))
            .json_schema("structured_response", schema);
        if let Some(t) = self.temperature_for() {
            request = request.temperature(t);
        }

        self.client().chat(&request).await
    }
}

#[async_trait]
impl ImageAgent for OpenAi {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = ImageRequest::new(&self.image_model, prompt);
        self.client().image(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;

    #[test]
    fn test_openai_new() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini");
        assert_eq!(ai.model(), "gpt-4o-mini");
        assert_eq!(ai.image_model(), "gpt-image-1");
        assert_eq!(ai.api_key, "sk-test");
    }

    #[test]
    fn test_openai_with_image_model() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_image_model("dall-e-3");
        assert_eq!(ai.image_model(), "dall-e-3");
    }

    #[test]
    fn test_openai_with_base_url() {
        let ai = OpenAi::new("sk-test", "gpt-4o").with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[test]
    fn test_gpt5_has_no_temperature() {
        assert_eq!(OpenAi::new("k", "gpt-5-mini").temperature_for(), None);
        assert_eq!(OpenAi::new("k", "gpt-4o").temperature_for(), Some(0.0));
    }

    #[test]
    fn test_unreachable_endpoint_is_network_error() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url("http://127.0.0.1:9/v1");
        let result = tokio_test::block_on(ai.chat_completion("sys", "hi"));
        assert!(matches!(result, Err(AiError::Network(_))));
    }
}
