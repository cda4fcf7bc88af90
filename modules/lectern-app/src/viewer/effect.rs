use lectern_common::{Flashcard, Language, Soft};

use super::state::Ticket;
use super::ViewerId;

/// What the host must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Perform a content service call and feed back its [`Completion`].
    Request(Request),
    Notify(Notice),
    /// The `onFlashcardCreated` callback. Always followed by [`Effect::Close`].
    FlashcardCreated(Flashcard),
    CopyToClipboard(String),
    /// The `onClose` callback. The host discards the viewer.
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub viewer: ViewerId,
    pub ticket: Ticket,
    pub kind: RequestKind,
}

impl Request {
    pub fn complete(&self, outcome: Outcome) -> Completion {
        Completion {
            viewer: self.viewer,
            ticket: self.ticket,
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Translate { text: String, language: Language },
    GenerateImage { prompt: String },
    CreateFlashcard { text: String, image: String },
}

impl RequestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Translate { .. } => "translate",
            RequestKind::GenerateImage { .. } => "generate_image",
            RequestKind::CreateFlashcard { .. } => "create_flashcard",
        }
    }
}

/// Result of a [`Request`], addressed back to the viewer and ticket that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub viewer: ViewerId,
    pub ticket: Ticket,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Translated(Soft<String>),
    /// `Err` carries the failure reason for the logs; users see a notice.
    Image(Result<String, String>),
    Flashcard(Soft<Flashcard>),
}

/// Blocking, user-facing notices raised by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Create-flashcard was triggered with nothing selected.
    EmptySelection,
    ImageGenerationFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::EmptySelection => "Please select a text fragment to create the flashcard.",
            Notice::ImageGenerationFailed => {
                "There was an error generating the image. Please try again."
            }
        }
    }
}
