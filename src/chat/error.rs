use thiserror::Error;

use crate::core::errors::ApiError;

pub const NO_QUERY_MESSAGE: &str = "No query provided";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("No query provided")]
    Validation,

    #[error("Chatbot not properly initialized: {0}")]
    Configuration(String),

    #[error("{0}")]
    UpstreamGeneration(String),
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation => ApiError::BadRequest(NO_QUERY_MESSAGE.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
