//! The result viewer: a pure state machine over one bound search result.
//!
//! Input events (mode switches, selections, button presses) and request
//! completions all go through [`ResultViewer::update`], which mutates the
//! viewer and returns the [`Effect`]s the host must carry out. The viewer
//! never performs I/O itself.
//!
//! Every request carries the viewer's id and a fresh [`Ticket`]. A completion
//! whose viewer id or ticket is no longer current is dropped, so responses
//! that arrive after a rebind, or for a viewer that has been discarded, can
//! never write into the wrong state.

mod effect;
mod pane;
mod state;

use std::str::FromStr;

use lectern_common::{Language, SearchResult, Soft};
use tracing::{debug, info};
use uuid::Uuid;

pub use effect::{Completion, Effect, Notice, Outcome, Request, RequestKind};
pub use pane::ContentPane;
pub use state::Ticket;

pub(crate) use state::TicketCounter;
use state::{FlashcardState, ImageState, TranslationState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewerId(Uuid);

impl ViewerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ViewerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Which projection of a result's content is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    Data,
    Image,
    Full,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Data, ViewMode::Image, ViewMode::Full];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Data => "data",
            ViewMode::Image => "image",
            ViewMode::Full => "full",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown view mode: {s} (expected data, image or full)"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    SetMode(ViewMode),
    /// The platform's current text selection after a pointer-up.
    TextSelected(String),
    SetLanguage(Language),
    SetPrompt(String),
    Translate,
    GenerateImage,
    CreateFlashcard,
    CopyTranslation,
    Close,
    Completed(Completion),
}

pub struct ResultViewer {
    id: ViewerId,
    result: SearchResult,
    mode: ViewMode,
    selection: Option<String>,
    language: Language,
    prompt: String,
    translation: TranslationState,
    image: ImageState,
    flashcard: FlashcardState,
    tickets: TicketCounter,
}

impl ResultViewer {
    pub fn new(result: SearchResult) -> Self {
        let viewer = Self {
            id: ViewerId::new(),
            result,
            mode: ViewMode::default(),
            selection: None,
            language: Language::default(),
            prompt: String::new(),
            translation: TranslationState::Idle,
            image: ImageState::Idle,
            flashcard: FlashcardState::Idle,
            tickets: TicketCounter::default(),
        };
        info!(viewer = %viewer.id, result = %viewer.result.id, "Viewer opened");
        viewer
    }

    /// Bind a different result. Every per-result field returns to its initial
    /// value; the chosen language is kept. Requests issued for the previous
    /// result are orphaned and their completions dropped.
    pub fn rebind(&mut self, result: SearchResult) {
        debug!(viewer = %self.id, from = %self.result.id, to = %result.id, "Viewer rebound");
        self.result = result;
        self.mode = ViewMode::default();
        self.selection = None;
        self.prompt.clear();
        self.translation = TranslationState::Idle;
        self.image = ImageState::Idle;
        self.flashcard = FlashcardState::Idle;
    }

    /// Discard the viewer, handing back the result it was bound to.
    pub fn close(self) -> SearchResult {
        debug!(viewer = %self.id, "Viewer discarded");
        self.result
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> ViewerId {
        self.id
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The translation currently displayed, if any.
    pub fn translation(&self) -> Option<&Soft<String>> {
        self.translation.displayed()
    }

    pub fn generated_image(&self) -> Option<&str> {
        self.image.generated()
    }

    /// Why the last image generation failed, until the next attempt.
    pub fn image_failure(&self) -> Option<&str> {
        self.image.failure()
    }

    pub fn is_translating(&self) -> bool {
        self.translation.pending_ticket().is_some()
    }

    pub fn is_generating_image(&self) -> bool {
        self.image.pending_ticket().is_some()
    }

    pub fn is_creating_flashcard(&self) -> bool {
        self.flashcard.pending_ticket().is_some()
    }

    pub fn pane(&self) -> ContentPane<'_> {
        pane::project(self)
    }

    /// The separate "translated content" panel below the pane, shown in data
    /// mode only.
    pub fn translation_panel(&self) -> Option<&Soft<String>> {
        match self.mode {
            ViewMode::Data => self.translation().filter(|t| !t.as_str().is_empty()),
            ViewMode::Image | ViewMode::Full => None,
        }
    }

    /// Text a translate action would send: the selection if there is one,
    /// else the displayed projection. `None` in image mode.
    pub fn translation_input(&self) -> Option<&str> {
        let text = match (self.mode, self.selection.as_deref()) {
            (ViewMode::Image, _) => return None,
            (_, Some(selection)) => selection,
            (ViewMode::Data, None) => self.result.content.data.as_str(),
            (ViewMode::Full, None) => self.result.content.full.as_str(),
        };
        Some(text).filter(|t| !t.trim().is_empty())
    }

    /// Image a new flashcard would carry: the generated one, else the result's own.
    pub fn flashcard_image(&self) -> &str {
        self.generated_image()
            .unwrap_or(self.result.content.image.as_str())
    }

    pub fn can_translate(&self) -> bool {
        !self.is_translating() && self.translation_input().is_some()
    }

    pub fn can_generate_image(&self) -> bool {
        self.mode == ViewMode::Image && !self.is_generating_image() && !self.prompt.trim().is_empty()
    }

    pub fn can_create_flashcard(&self) -> bool {
        self.selection.is_some() && !self.is_creating_flashcard()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    pub fn update(&mut self, event: ViewerEvent) -> Vec<Effect> {
        match event {
            ViewerEvent::SetMode(mode) => {
                self.mode = mode;
                vec![]
            }
            ViewerEvent::TextSelected(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return vec![];
                }
                if !self.pane().is_selectable() {
                    debug!(viewer = %self.id, mode = %self.mode, "Pane is not selectable, selection ignored");
                    return vec![];
                }
                self.selection = Some(text.to_string());
                vec![]
            }
            ViewerEvent::SetLanguage(language) => {
                self.language = language;
                vec![]
            }
            ViewerEvent::SetPrompt(prompt) => {
                self.prompt = prompt;
                vec![]
            }
            ViewerEvent::Translate => self.translate(),
            ViewerEvent::GenerateImage => self.generate_image(),
            ViewerEvent::CreateFlashcard => self.create_flashcard(),
            ViewerEvent::CopyTranslation => self
                .translation()
                .map(|t| vec![Effect::CopyToClipboard(t.as_str().to_string())])
                .unwrap_or_default(),
            ViewerEvent::Close => vec![Effect::Close],
            ViewerEvent::Completed(completion) => self.complete(completion),
        }
    }

    fn request(&mut self, kind: RequestKind) -> (Ticket, Effect) {
        let ticket = self.tickets.next();
        debug!(viewer = %self.id, %ticket, request = kind.label(), "Issuing request");
        let request = Request {
            viewer: self.id,
            ticket,
            kind,
        };
        (ticket, Effect::Request(request))
    }

    fn translate(&mut self) -> Vec<Effect> {
        if !self.can_translate() {
            return vec![];
        }
        let Some(text) = self.translation_input().map(str::to_string) else {
            return vec![];
        };

        let (ticket, effect) = self.request(RequestKind::Translate {
            text,
            language: self.language,
        });
        let shown = self.translation().cloned();
        self.translation = TranslationState::Pending { ticket, shown };
        vec![effect]
    }

    fn generate_image(&mut self) -> Vec<Effect> {
        if !self.can_generate_image() {
            return vec![];
        }

        let (ticket, effect) = self.request(RequestKind::GenerateImage {
            prompt: self.prompt.trim().to_string(),
        });
        self.image = ImageState::Generating { ticket };
        vec![effect]
    }

    fn create_flashcard(&mut self) -> Vec<Effect> {
        let Some(text) = self.selection.clone() else {
            return vec![Effect::Notify(Notice::EmptySelection)];
        };
        if !self.can_create_flashcard() {
            return vec![];
        }

        let image = self.flashcard_image().to_string();
        let (ticket, effect) = self.request(RequestKind::CreateFlashcard { text, image });
        self.flashcard = FlashcardState::Generating { ticket };
        vec![effect]
    }

    fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        let Completion {
            viewer,
            ticket,
            outcome,
        } = completion;

        if viewer != self.id {
            debug!(viewer = %self.id, other = %viewer, %ticket, "Dropping completion for another viewer");
            return vec![];
        }

        match outcome {
            Outcome::Translated(soft) if self.translation.pending_ticket() == Some(ticket) => {
                if let Some(reason) = soft.reason() {
                    debug!(viewer = %self.id, %ticket, reason, "Translation degraded");
                }
                self.translation = TranslationState::Ready(soft);
                vec![]
            }
            Outcome::Image(Ok(reference)) if self.image.pending_ticket() == Some(ticket) => {
                self.image = ImageState::Ready(reference);
                vec![]
            }
            Outcome::Image(Err(reason)) if self.image.pending_ticket() == Some(ticket) => {
                debug!(viewer = %self.id, %ticket, reason = %reason, "Image generation failed");
                self.image = ImageState::Failed { reason };
                vec![Effect::Notify(Notice::ImageGenerationFailed)]
            }
            Outcome::Flashcard(soft) if self.flashcard.pending_ticket() == Some(ticket) => {
                self.flashcard = FlashcardState::Idle;
                let degraded = soft.is_degraded();
                let card = soft.into_value();
                info!(viewer = %self.id, result = %self.result.id, degraded, "Flashcard created");
                vec![Effect::FlashcardCreated(card), Effect::Close]
            }
            _ => {
                debug!(viewer = %self.id, %ticket, "Dropping stale completion");
                vec![]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_common::ContentType;
    use lectern_content::testing::sample_result;

    fn open(content_type: ContentType) -> ResultViewer {
        ResultViewer::new(sample_result("doc1", content_type))
    }

    fn single_request(effects: Vec<Effect>) -> Request {
        match effects.as_slice() {
            [Effect::Request(request)] => request.clone(),
            other => panic!("expected one request, got {other:?}"),
        }
    }

    #[test]
    fn view_mode_parses() {
        assert_eq!("Image".parse::<ViewMode>(), Ok(ViewMode::Image));
        assert!("pdf".parse::<ViewMode>().is_err());
    }

    #[test]
    fn blank_selection_is_sticky() {
        let mut viewer = open(ContentType::Document);
        viewer.update(ViewerEvent::TextSelected("  hello ".into()));
        viewer.update(ViewerEvent::TextSelected("   ".into()));
        assert_eq!(viewer.selection(), Some("hello"));
    }

    #[test]
    fn translate_prefers_selection() {
        let mut viewer = open(ContentType::News);
        viewer.update(ViewerEvent::TextSelected("hello".into()));
        let request = single_request(viewer.update(ViewerEvent::Translate));
        assert_eq!(
            request.kind,
            RequestKind::Translate {
                text: "hello".into(),
                language: Language::En
            }
        );
        assert!(viewer.is_translating());
    }

    #[test]
    fn translate_is_not_reentrant() {
        let mut viewer = open(ContentType::News);
        viewer.update(ViewerEvent::Translate);
        assert!(viewer.update(ViewerEvent::Translate).is_empty());
    }

    #[test]
    fn pending_retranslation_keeps_old_text_visible() {
        let mut viewer = open(ContentType::News);
        let first = single_request(viewer.update(ViewerEvent::Translate));
        viewer.update(ViewerEvent::Completed(
            first.complete(Outcome::Translated(Soft::Ok("B".into()))),
        ));

        viewer.update(ViewerEvent::SetLanguage(Language::Ja));
        viewer.update(ViewerEvent::Translate);

        assert!(viewer.is_translating());
        assert_eq!(viewer.translation().map(Soft::as_str), Some("B"));
    }

    #[test]
    fn rebind_orphans_inflight_requests() {
        let mut viewer = open(ContentType::News);
        let request = single_request(viewer.update(ViewerEvent::Translate));

        viewer.rebind(sample_result("doc2", ContentType::Forum));
        let effects = viewer.update(ViewerEvent::Completed(
            request.complete(Outcome::Translated(Soft::Ok("late".into()))),
        ));

        assert!(effects.is_empty());
        assert!(viewer.translation().is_none());
        assert_eq!(viewer.result().id, "doc2");
    }

    #[test]
    fn completion_for_other_viewer_is_dropped() {
        let mut first = open(ContentType::News);
        let mut second = open(ContentType::News);
        let request = single_request(first.update(ViewerEvent::Translate));
        second.update(ViewerEvent::Translate);

        second.update(ViewerEvent::Completed(
            request.complete(Outcome::Translated(Soft::Ok("X".into()))),
        ));

        assert!(second.is_translating());
        assert!(second.translation().is_none());
    }

    #[test]
    fn copy_translation_requires_one() {
        let mut viewer = open(ContentType::News);
        assert!(viewer.update(ViewerEvent::CopyTranslation).is_empty());

        let request = single_request(viewer.update(ViewerEvent::Translate));
        viewer.update(ViewerEvent::Completed(
            request.complete(Outcome::Translated(Soft::Ok("Hallo".into()))),
        ));
        assert_eq!(
            viewer.update(ViewerEvent::CopyTranslation),
            vec![Effect::CopyToClipboard("Hallo".into())]
        );
    }

    #[test]
    fn flashcard_uses_generated_image_when_present() {
        let mut viewer = open(ContentType::Forum);
        viewer.update(ViewerEvent::SetMode(ViewMode::Image));
        viewer.update(ViewerEvent::SetPrompt("a red fox".into()));
        let request = single_request(viewer.update(ViewerEvent::GenerateImage));
        viewer.update(ViewerEvent::Completed(
            request.complete(Outcome::Image(Ok("data:image/png;base64,AA==".into()))),
        ));

        viewer.update(ViewerEvent::SetMode(ViewMode::Data));
        viewer.update(ViewerEvent::TextSelected("foxes hunt at dusk".into()));
        let request = single_request(viewer.update(ViewerEvent::CreateFlashcard));

        assert_eq!(
            request.kind,
            RequestKind::CreateFlashcard {
                text: "foxes hunt at dusk".into(),
                image: "data:image/png;base64,AA==".into(),
            }
        );
    }

    #[test]
    fn video_without_embed_falls_back_to_text() {
        let mut result = sample_result("vid1", ContentType::Video);
        result.content.full = "https://www.youtube.com/watch?v=abc".into();
        let mut viewer = ResultViewer::new(result);
        viewer.update(ViewerEvent::SetMode(ViewMode::Full));
        assert_eq!(
            viewer.pane(),
            ContentPane::Text {
                text: "https://www.youtube.com/watch?v=abc",
                translated: false
            }
        );
    }
}
