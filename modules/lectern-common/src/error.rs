use thiserror::Error;

#[derive(Error, Debug)]
pub enum LecternError {
    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Image generation failed: {0}")]
    ImageGenerationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LecternError {
    /// Message shown to the user. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            LecternError::SearchFailed(_) => {
                "An error occurred during the search. Please try again."
            }
            LecternError::ImageGenerationFailed(_) => {
                "There was an error generating the image. Please try again."
            }
            LecternError::Config(_) => {
                "Lectern is not configured. Set OPENAI_API_KEY (in the environment or .env)."
            }
        }
    }
}
