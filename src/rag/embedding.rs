//! Text → vector providers.
//!
//! `HashEmbeddingProvider` is a deterministic bag-of-words hasher that needs
//! no model download; `OpenAiEmbeddingProvider` calls any server exposing an
//! OpenAI-compatible `/embeddings` endpoint (LM Studio, Ollama, vLLM, ...).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::error::EmbeddingError;
use crate::core::config::{EmbeddingBackend, EmbeddingSettings};

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name for logs and health output.
    fn name(&self) -> &str;

    /// Embed every input, preserving order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

pub fn build_embedding_provider(
    settings: &EmbeddingSettings,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    match settings.backend {
        EmbeddingBackend::Hash => Ok(Arc::new(HashEmbeddingProvider::new(settings.dimensions))),
        EmbeddingBackend::OpenAi => Ok(Arc::new(OpenAiEmbeddingProvider::new(
            settings.base_url.clone(),
            settings.model.clone(),
            settings.api_key.clone(),
            settings.timeout,
        )?)),
    }
}

// ---------------------------------------------------------------------------
// Hash embeddings
// ---------------------------------------------------------------------------

/// Function words that carry no topic signal for support questions.
const STOPWORDS: [&str; 50] = [
    "a", "an", "the", "is", "are", "am", "was", "were", "be", "do", "does", "did", "i", "me",
    "my", "you", "your", "we", "our", "it", "its", "what", "which", "who", "how", "where",
    "when", "why", "can", "could", "should", "would", "will", "to", "of", "in", "on", "for",
    "from", "with", "about", "at", "by", "and", "or", "s", "there", "this", "that", "if",
];

#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dim: usize,
}

impl HashEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(8) }
    }

    /// Stopword-only text ("Who are you?") keeps all of its words so that it
    /// still has a non-zero embedding.
    fn embed_one(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        let content: Vec<&str> = words
            .iter()
            .copied()
            .filter(|t| !STOPWORDS.contains(t))
            .collect();
        let tokens = if content.is_empty() { words } else { content };

        let mut v = vec![0.0f32; self.dim];
        for token in tokens {
            // FNV-1a
            let mut h: u64 = 0xcbf2_9ce4_8422_2325;
            for b in token.as_bytes() {
                h ^= *b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
            let idx = (h % self.dim as u64) as usize;
            v[idx] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self::new(crate::core::config::settings::DEFAULT_EMBEDDING_DIM)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(inputs.iter().map(|text| self.embed_one(text)).collect())
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible embeddings
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct OpenAiEmbeddingProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": inputs,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        let embeddings = parse_embeddings(&payload)?;
        if embeddings.len() != inputs.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: inputs.len(),
                actual: embeddings.len(),
            });
        }
        Ok(embeddings)
    }
}

fn parse_embeddings(payload: &Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let data = payload["data"]
        .as_array()
        .ok_or_else(|| EmbeddingError::Malformed("missing 'data' array".to_string()))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let values = item["embedding"].as_array().ok_or_else(|| {
            EmbeddingError::Malformed(format!("item {} has no 'embedding' array", position))
        })?;
        let vector: Vec<f32> = values
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();
        if vector.len() != values.len() {
            return Err(EmbeddingError::Malformed(format!(
                "item {} contains non-numeric values",
                position
            )));
        }
        let index = item["index"].as_u64().map(|i| i as usize).unwrap_or(position);
        indexed.push((index, vector));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn hash_embeddings_are_normalized_and_deterministic() {
        let provider = HashEmbeddingProvider::new(64);
        let inputs = vec!["Reset my password".to_string(), "reset MY password!".to_string()];

        let vectors = provider.embed(&inputs).await.expect("hash embed");

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), 64);
        assert!((dot(&vectors[0], &vectors[0]) - 1.0).abs() < 1e-5);
        assert_eq!(vectors[0], vectors[1]);
    }

    #[tokio::test]
    async fn hash_embedding_without_words_is_zero() {
        let provider = HashEmbeddingProvider::new(16);
        let vectors = provider
            .embed(&["?!".to_string(), "   ".to_string()])
            .await
            .expect("hash embed");
        assert!(vectors.iter().flatten().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn stopword_only_text_falls_back_to_all_words() {
        let provider = HashEmbeddingProvider::new(64);
        let vectors = provider
            .embed(&[
                "Who are you?".to_string(),
                "who ARE you".to_string(),
                "How do I reset my password?".to_string(),
            ])
            .await
            .expect("hash embed");

        assert!((dot(&vectors[0], &vectors[0]) - 1.0).abs() < 1e-5);
        assert_eq!(vectors[0], vectors[1]);
        // stopwords are still ignored once a content word is present
        let reset = provider
            .embed(&["reset password".to_string()])
            .await
            .expect("hash embed");
        assert_eq!(vectors[2], reset[0]);
    }

    #[test]
    fn parse_embeddings_orders_by_index() {
        let payload = json!({
            "data": [
                { "index": 1, "embedding": [0.0, 1.0] },
                { "index": 0, "embedding": [1.0, 0.0] }
            ]
        });

        let parsed = parse_embeddings(&payload).expect("parse");
        assert_eq!(parsed, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn parse_embeddings_rejects_missing_data() {
        let err = parse_embeddings(&json!({ "error": "nope" })).expect_err("malformed");
        assert!(matches!(err, EmbeddingError::Malformed(_)));
    }

    #[test]
    fn factory_respects_backend_choice() {
        let settings = EmbeddingSettings {
            dimensions: 32,
            ..EmbeddingSettings::default()
        };
        let provider = build_embedding_provider(&settings).expect("hash provider");
        assert_eq!(provider.name(), "hash");
    }
}
