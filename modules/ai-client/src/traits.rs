use async_trait::async_trait;

use crate::error::Result;

// =============================================================================
// TextAgent Trait
// =============================================================================

/// Dyn-compatible text generation: plain completions and schema-constrained
/// JSON output. Implemented by [`crate::OpenAi`]; tests substitute fakes.
#[async_trait]
pub trait TextAgent: Send + Sync {
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String>;

    /// Returns the raw JSON text the model produced for `schema`.
    async fn structured_output(
        &self,
        system: &str,
        user: &str,
        schema: serde_json::Value,
    ) -> Result<String>;
}

// =============================================================================
// ImageAgent Trait
// =============================================================================

#[async_trait]
pub trait ImageAgent: Send + Sync {
    /// Generate one image and return a renderable reference: either a remote
    /// URL or a `data:` URL carrying the base64 payload.
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}
