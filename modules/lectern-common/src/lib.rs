pub mod config;
pub mod error;
pub mod language;
pub mod soft;
pub mod types;

pub use config::AppConfig;
pub use error::LecternError;
pub use language::{Language, LanguageParseError};
pub use soft::Soft;
pub use types::*;
