//! Interactive core of lectern: the result viewer state machine, the search
//! orchestrator around it, and the runtime that performs their requests.

pub mod app;
pub mod presenter;
pub mod runtime;
pub mod timer;
pub mod viewer;

pub use app::{App, AppEffect, AppEvent, SearchPhase};
pub use presenter::{CardFace, FlashcardPresenter};
pub use runtime::{settle, settle_viewer, Runtime};
pub use timer::SearchTimer;
pub use viewer::{
    Completion, ContentPane, Effect, Notice, Outcome, Request, RequestKind, ResultViewer, Ticket,
    ViewMode, ViewerEvent, ViewerId,
};
