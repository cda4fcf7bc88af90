//! The content service: search, translation, flashcard synthesis and image
//! synthesis, all delegated to a generative-AI provider.

pub mod prompts;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use service::{AiContentService, SearchSettings};
pub use traits::ContentService;
