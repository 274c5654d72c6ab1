//! FAQ retrieval: embedding, thresholded nearest-neighbour lookup and the
//! atomically swapped index generation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use super::embedding::EmbeddingProvider;
use super::error::{IndexingError, RetrievalError};
use super::index::{FlatIndex, IndexHit};
use crate::faq::{Faq, FaqStore};

/// Distances within this slack of `[0, 1]` are clamped instead of rejected.
const DISTANCE_TOLERANCE: f32 = 1e-4;

/// One index generation. The index and the store are always built together
/// and replaced together.
struct IndexSnapshot {
    index: FlatIndex,
    store: FaqStore,
    indexed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub faq_count: usize,
    pub dimensions: usize,
    pub indexed_at: DateTime<Utc>,
}

pub struct RetrievalService {
    embedder: Arc<dyn EmbeddingProvider>,
    active: RwLock<Option<Arc<IndexSnapshot>>>,
    writer: Mutex<()>,
}

impl RetrievalService {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            active: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Embeds every question, builds a fresh index and swaps it in together
    /// with a new FAQ store. On error the previous generation stays active.
    pub async fn index(&self, faqs: &[Faq]) -> Result<IndexStats, IndexingError> {
        let _writer = self.writer.lock().await;

        let store = FaqStore::from_faqs(faqs);
        if store.is_empty() {
            return Err(IndexingError::EmptyCorpus);
        }

        let questions = store.questions().to_vec();
        let vectors = self.embedder.embed(&questions).await?;
        if vectors.len() != questions.len() {
            return Err(IndexingError::Embedding(
                super::error::EmbeddingError::CountMismatch {
                    expected: questions.len(),
                    actual: vectors.len(),
                },
            ));
        }

        let index = FlatIndex::build(questions.into_iter().zip(vectors).collect())?;
        let snapshot = Arc::new(IndexSnapshot {
            index,
            store,
            indexed_at: Utc::now(),
        });
        let stats = snapshot_stats(&snapshot);

        *self.active.write().await = Some(snapshot);

        tracing::info!(
            "Indexed {} FAQs ({} dims, embedder: {})",
            stats.faq_count,
            stats.dimensions,
            self.embedder.name()
        );
        Ok(stats)
    }

    /// FAQs whose similarity to `query` clears `score_threshold`, in index
    /// order. Any failure is logged and reported as no results.
    pub async fn search(&self, query: &str, k: usize, score_threshold: f32) -> Vec<Faq> {
        match self.try_search(query, k, score_threshold).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!("FAQ search failed, continuing without context: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn try_search(
        &self,
        query: &str,
        k: usize,
        score_threshold: f32,
    ) -> Result<Vec<Faq>, RetrievalError> {
        let Some(snapshot) = self.snapshot().await else {
            tracing::debug!("FAQ search skipped: no index loaded");
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }
        let threshold = score_threshold.clamp(0.0, 1.0);

        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        let Some(query_vector) = vectors.pop() else {
            return Err(super::error::EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            }
            .into());
        };

        let hits = snapshot.index.search(&query_vector, k)?;

        let mut results = Vec::new();
        for hit in hits {
            let similarity = similarity_from_distance(&hit)?;
            tracing::debug!(
                "FAQ candidate '{}' distance={:.4} similarity={:.4}",
                hit.label,
                hit.distance,
                similarity
            );
            if !clears_threshold(similarity, threshold) {
                continue;
            }
            let faq = snapshot
                .store
                .get(&hit.label)
                .ok_or_else(|| RetrievalError::OrphanedLabel(hit.label.clone()))?;
            results.push(faq);
        }

        Ok(results)
    }

    pub async fn stats(&self) -> Option<IndexStats> {
        self.snapshot().await.map(|snapshot| snapshot_stats(&snapshot))
    }

    pub async fn faqs(&self) -> Vec<Faq> {
        self.snapshot()
            .await
            .map(|snapshot| snapshot.store.faqs())
            .unwrap_or_default()
    }

    async fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.active.read().await.clone()
    }
}

fn snapshot_stats(snapshot: &IndexSnapshot) -> IndexStats {
    IndexStats {
        faq_count: snapshot.store.len(),
        dimensions: snapshot.index.dimensions(),
        indexed_at: snapshot.indexed_at,
    }
}

/// `1 - distance`, after checking the distance is a bounded cosine distance.
pub fn similarity_from_distance(hit: &IndexHit) -> Result<f32, RetrievalError> {
    let distance = hit.distance;
    if !distance.is_finite()
        || distance < -DISTANCE_TOLERANCE
        || distance > 1.0 + DISTANCE_TOLERANCE
    {
        return Err(RetrievalError::ScoreOutOfRange {
            label: hit.label.clone(),
            distance,
        });
    }
    Ok(1.0 - distance.clamp(0.0, 1.0))
}

/// Strictly above the threshold; a zero threshold admits every candidate.
pub fn clears_threshold(similarity: f32, threshold: f32) -> bool {
    threshold <= 0.0 || similarity > threshold
}
