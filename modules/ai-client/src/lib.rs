pub mod error;
pub mod openai;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use openai::{OpenAi, StructuredOutput};
pub use traits::{ImageAgent, TextAgent};
pub use util::{image_data_url, strip_code_blocks, truncate_to_char_boundary};
