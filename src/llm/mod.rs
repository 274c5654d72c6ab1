//! Chat-completion client layer.

pub mod error;
pub mod openai;
pub mod provider;
pub mod retry;
pub mod types;

use std::sync::Arc;

use crate::core::config::{ConfigError, LlmSettings};

pub use error::LlmError;
pub use openai::OpenAiCompatibleProvider;
pub use provider::LlmProvider;
pub use retry::{RetryConfig, RetryingProvider};
pub use types::{ChatMessage, ChatRequest, ChatRole};

#[derive(Debug, thiserror::Error)]
pub enum LlmSetupError {
    #[error(transparent)]
    Credential(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] LlmError),
}

/// Builds the production chat client: the OpenAI-compatible provider wrapped
/// with timeout and retry handling. Fails when no API key is configured.
pub fn build_llm_provider(settings: &LlmSettings) -> Result<Arc<dyn LlmProvider>, LlmSetupError> {
    let api_key = settings.require_api_key()?;
    let provider = OpenAiCompatibleProvider::from_settings(settings, api_key)?;
    tracing::info!(model = %provider.model(), base_url = %settings.base_url, "LLM client configured");
    Ok(Arc::new(RetryingProvider::new(
        Arc::new(provider),
        RetryConfig::from_settings(settings),
    )))
}
