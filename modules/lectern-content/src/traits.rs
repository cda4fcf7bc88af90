use async_trait::async_trait;
use lectern_common::{Flashcard, Language, LecternError, SearchResult, Soft};

/// Operations the viewer and the search shell delegate to the AI provider.
///
/// Each call is a single request/response with no retry or streaming.
/// The failure contracts differ per operation and callers rely on them:
///
/// - `search` and `make_image` fail hard with a [`LecternError`].
/// - `translate` and `make_flashcard` never fail; a provider failure yields
///   [`Soft::Degraded`] carrying a usable fallback value.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Results ordered by relevance as decided by the provider.
    /// Fails with `SearchFailed` on a blank query or a provider error.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LecternError>;

    /// On failure the degraded value is `text` prefixed with
    /// [`crate::prompts::TRANSLATION_FAILED_MARKER`].
    async fn translate(&self, text: &str, language: Language) -> Soft<String>;

    /// The card's thumbnail is always `image`. On failure the degraded card
    /// asks about a truncated prefix of `text` and answers with all of it.
    async fn make_flashcard(&self, text: &str, image: &str) -> Soft<Flashcard>;

    /// Returns a renderable image reference (URL or `data:` URL).
    /// Fails with `ImageGenerationFailed` on a blank prompt, a provider error,
    /// or a response without an image payload.
    async fn make_image(&self, prompt: &str) -> Result<String, LecternError>;
}
