use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};

use super::error::LlmError;
use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::config::LlmSettings;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: bool,
    /// Upper bound on a single provider call.
    pub attempt_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: settings.initial_backoff,
            max_delay: settings.max_backoff,
            attempt_timeout: settings.timeout,
            ..Default::default()
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.initial_delay,
            max_interval: self.max_delay,
            multiplier: self.multiplier,
            max_elapsed_time: None,
            ..Default::default()
        };
        if !self.jitter {
            backoff.randomization_factor = 0.0;
        }
        backoff
    }
}

/// Wraps a provider with a per-attempt timeout and exponential backoff on
/// retryable failures.
pub struct RetryingProvider {
    inner: Arc<dyn LlmProvider>,
    config: RetryConfig,
    name: String,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, config: RetryConfig) -> Self {
        let name = format!("retrying({})", inner.name());
        Self {
            inner,
            config,
            name,
        }
    }

    async fn attempt(&self, request: ChatRequest) -> Result<String, LlmError> {
        match tokio::time::timeout(self.config.attempt_timeout, self.inner.chat(request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.config.attempt_timeout)),
        }
    }
}

#[async_trait]
impl LlmProvider for RetryingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError> {
        let mut backoff = self.config.backoff();
        let mut attempts = 0usize;

        loop {
            attempts += 1;
            let error = match self.attempt(request.clone()).await {
                Ok(text) => return Ok(text),
                Err(error) => error,
            };

            if !error.is_retryable() || attempts >= self.config.max_attempts {
                if attempts > 1 {
                    tracing::warn!(attempts, error = %error, "LLM call failed after retries");
                }
                return Err(error);
            }

            let delay = backoff.next_backoff().unwrap_or(self.config.max_delay);
            tracing::debug!(
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying LLM call"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
