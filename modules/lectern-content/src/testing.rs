// Test doubles for the content service.
//
// - ScriptedAgent (TextAgent + ImageAgent): canned provider replies for AiContentService
// - MockContentService (ContentService): HashMap-based replies, records every call
//
// Plus `sample_result` for building SearchResult fixtures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ai_client::{AiError, ImageAgent, TextAgent};
use async_trait::async_trait;
use lectern_common::{
    Certification, ContentType, Flashcard, Language, LecternError, ResultContent, SearchResult,
    Soft,
};

use crate::prompts;
use crate::traits::ContentService;

// ---------------------------------------------------------------------------
// ScriptedAgent
// ---------------------------------------------------------------------------

/// Provider fake. Unscripted operations fail with a 500 API error.
#[derive(Default)]
pub struct ScriptedAgent {
    chat: Option<String>,
    structured: Option<String>,
    image: Option<String>,
    calls: AtomicUsize,
    last_schema: Mutex<Option<serde_json::Value>>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat(mut self, reply: &str) -> Self {
        self.chat = Some(reply.to_string());
        self
    }

    pub fn structured(mut self, reply: &str) -> Self {
        self.structured = Some(reply.to_string());
        self
    }

    pub fn image(mut self, reference: &str) -> Self {
        self.image = Some(reference.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_schema(&self) -> Option<serde_json::Value> {
        self.last_schema.lock().unwrap().clone()
    }

    fn reply(&self, scripted: &Option<String>) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        scripted.clone().ok_or_else(|| AiError::Api {
            status: 500,
            body: "scripted failure".to_string(),
        })
    }
}

#[async_trait]
impl TextAgent for ScriptedAgent {
    async fn chat_completion(&self, _system: &str, _user: &str) -> Result<String, AiError> {
        self.reply(&self.chat)
    }

    async fn structured_output(
        &self,
        _system: &str,
        _user: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiError> {
        *self.last_schema.lock().unwrap() = Some(schema);
        self.reply(&self.structured)
    }
}

#[async_trait]
impl ImageAgent for ScriptedAgent {
    async fn generate_image(&self, _prompt: &str) -> Result<String, AiError> {
        self.reply(&self.image)
    }
}

// ---------------------------------------------------------------------------
// MockContentService
// ---------------------------------------------------------------------------

/// One recorded call against [`MockContentService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(String),
    Translate { text: String, language: Language },
    Flashcard { text: String, image: String },
    Image(String),
}

/// HashMap-based content service. Unregistered inputs follow each
/// operation's failure contract: hard errors for search and images, degraded
/// values for translation and flashcards.
/// Builder pattern: `.on_search()`, `.on_translate()`, `.on_flashcard()`, `.on_image()`.
#[derive(Default)]
pub struct MockContentService {
    searches: HashMap<String, Vec<SearchResult>>,
    translations: HashMap<(String, Language), String>,
    flashcards: HashMap<String, (String, String)>,
    images: HashMap<String, String>,
    calls: Mutex<Vec<Call>>,
}

impl MockContentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.searches.insert(query.to_string(), results);
        self
    }

    pub fn on_translate(mut self, text: &str, language: Language, translated: &str) -> Self {
        self.translations
            .insert((text.to_string(), language), translated.to_string());
        self
    }

    pub fn on_flashcard(mut self, text: &str, front: &str, back: &str) -> Self {
        self.flashcards
            .insert(text.to_string(), (front.to_string(), back.to_string()));
        self
    }

    pub fn on_image(mut self, prompt: &str, reference: &str) -> Self {
        self.images.insert(prompt.to_string(), reference.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ContentService for MockContentService {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LecternError> {
        self.record(Call::Search(query.to_string()));
        self.searches.get(query.trim()).cloned().ok_or_else(|| {
            LecternError::SearchFailed(format!("MockContentService: no search registered for {query}"))
        })
    }

    async fn translate(&self, text: &str, language: Language) -> Soft<String> {
        self.record(Call::Translate {
            text: text.to_string(),
            language,
        });
        match self.translations.get(&(text.to_string(), language)) {
            Some(translated) => Soft::Ok(translated.clone()),
            None => Soft::degraded(prompts::failed_translation(text), "not registered"),
        }
    }

    async fn make_flashcard(&self, text: &str, image: &str) -> Soft<Flashcard> {
        self.record(Call::Flashcard {
            text: text.to_string(),
            image: image.to_string(),
        });
        match self.flashcards.get(text) {
            Some((front, back)) => Soft::Ok(Flashcard {
                front: front.clone(),
                back: back.clone(),
                thumbnail: image.to_string(),
            }),
            None => Soft::degraded(prompts::fallback_flashcard(text, image), "not registered"),
        }
    }

    async fn make_image(&self, prompt: &str) -> Result<String, LecternError> {
        self.record(Call::Image(prompt.to_string()));
        self.images.get(prompt.trim()).cloned().ok_or_else(|| {
            LecternError::ImageGenerationFailed(format!(
                "MockContentService: no image registered for {prompt}"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A result whose projections are derived from `id`:
/// data `"<id> data"`, image `https://img.example/<id>.png`, full `"<id> full"`.
pub fn sample_result(id: &str, content_type: ContentType) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: format!("Title {id}"),
        source: "Example University".to_string(),
        content_type,
        certification: Certification::Verified,
        snippet: format!("Snippet {id}"),
        content: ResultContent {
            data: format!("{id} data"),
            image: format!("https://img.example/{id}.png"),
            full: format!("{id} full"),
        },
    }
}
