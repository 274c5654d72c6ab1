use thiserror::Error;

use crate::core::config::ConfigError;
use crate::faq::FaqSourceError;
use crate::rag::{EmbeddingError, IndexingError};

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize embedding provider: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Failed to load FAQs: {0}")]
    Faq(#[from] FaqSourceError),
}

#[derive(Debug, Error)]
pub enum ReindexError {
    #[error("Failed to load FAQs: {0}")]
    Source(#[from] FaqSourceError),

    #[error(transparent)]
    Indexing(#[from] IndexingError),
}
