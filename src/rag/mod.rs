//! Retrieval-augmented generation support.
//!
//! - `EmbeddingProvider`: text → vector (hash or OpenAI-compatible HTTP)
//! - `FlatIndex`: exact cosine-distance nearest-neighbour index
//! - `RetrievalService`: owns the active index/FAQ store generation

mod embedding;
mod error;
mod index;
mod retrieval;

pub use embedding::{
    build_embedding_provider, EmbeddingProvider, HashEmbeddingProvider, OpenAiEmbeddingProvider,
};
pub use error::{EmbeddingError, IndexError, IndexingError, RetrievalError};
pub use index::{FlatIndex, IndexHit};
pub use retrieval::{clears_threshold, similarity_from_distance, IndexStats, RetrievalService};
