use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    Request(String),

    #[error("Embedding backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed embedding response: {0}")]
    Malformed(String),

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Cannot build an index from zero vectors")]
    Empty,

    #[error("Vector for '{label}' has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("Vector for '{0}' contains non-finite values")]
    NonFinite(String),

    #[error("Index matrix construction failed: {0}")]
    Shape(String),

    #[error("Query vector has dimension {actual}, index expects {expected}")]
    QueryDimension { expected: usize, actual: usize },
}

/// Failure of `RetrievalService::index`. The previous generation stays active.
#[derive(Debug, Error)]
pub enum IndexingError {
    #[error("Cannot index an empty FAQ corpus")]
    EmptyCorpus,

    #[error("Failed to embed FAQ questions: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Failed to build vector index: {0}")]
    Index(#[from] IndexError),
}

/// Failure of a single search. Callers of `search` only ever see an empty
/// result; `try_search` exposes the cause.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Failed to embed query: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index search failed: {0}")]
    Index(#[from] IndexError),

    #[error("Index returned distance {distance} for '{label}', outside the [0, 1] cosine range")]
    ScoreOutOfRange { label: String, distance: f32 },

    #[error("Index returned '{0}' which has no FAQ store entry")]
    OrphanedLabel(String),
}
