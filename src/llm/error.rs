use thiserror::Error;

use crate::collaborator::ExtractError;

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Ollama error: {0}")]
    OllamaError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<LLMError> for ExtractError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::SerializationError(_) | LLMError::InvalidResponse(_) => {
                ExtractError::InvalidOutput(err.to_string())
            }
            _ => ExtractError::Backend(err.to_string()),
        }
    }
}
