use async_trait::async_trait;

use super::error::LlmError;
use super::types::ChatRequest;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// provider name (e.g. "groq", "retrying(groq)")
    fn name(&self) -> &str;

    /// chat completion (non-streaming), returns the assistant text
    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError>;
}
