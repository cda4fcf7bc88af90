//! Per-concern viewer state. One tagged union per asynchronous concern, so
//! "in flight" and "has a value" cannot disagree.

use lectern_common::Soft;

/// Sequence number of an issued request. A completion is applied only while
/// its ticket is the one the concern is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub(crate) u64);

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TicketCounter(u64);

impl TicketCounter {
    pub fn next(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationState {
    #[default]
    Idle,
    /// `shown` is the previous translation, still displayed while waiting.
    Pending {
        ticket: Ticket,
        shown: Option<Soft<String>>,
    },
    Ready(Soft<String>),
}

impl TranslationState {
    pub fn displayed(&self) -> Option<&Soft<String>> {
        match self {
            TranslationState::Idle => None,
            TranslationState::Pending { shown, .. } => shown.as_ref(),
            TranslationState::Ready(soft) => Some(soft),
        }
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        match self {
            TranslationState::Pending { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Idle,
    Generating {
        ticket: Ticket,
    },
    Ready(String),
    Failed {
        reason: String,
    },
}

impl ImageState {
    pub fn generated(&self) -> Option<&str> {
        match self {
            ImageState::Ready(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        match self {
            ImageState::Generating { ticket } => Some(*ticket),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ImageState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashcardState {
    #[default]
    Idle,
    Generating {
        ticket: Ticket,
    },
}

impl FlashcardState {
    pub fn pending_ticket(&self) -> Option<Ticket> {
        match self {
            FlashcardState::Generating { ticket } => Some(*ticket),
            FlashcardState::Idle => None,
        }
    }
}
