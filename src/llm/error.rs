use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Transport(String),

    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed LLM response: {0}")]
    Malformed(String),

    #[error("LLM returned an empty completion")]
    EmptyCompletion,
}

impl LlmError {
    /// Transport failures, timeouts, rate limiting and server errors are
    /// worth another attempt; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport(_) | LlmError::Timeout(_) => true,
            LlmError::Status { status, .. } => *status == 429 || *status >= 500,
            LlmError::Malformed(_) | LlmError::EmptyCompletion => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_retryable_errors() {
        assert!(LlmError::Transport("reset".to_string()).is_retryable());
        assert!(LlmError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(LlmError::Status {
            status: 429,
            body: String::new()
        }
        .is_retryable());
        assert!(LlmError::Status {
            status: 503,
            body: String::new()
        }
        .is_retryable());

        assert!(!LlmError::Status {
            status: 401,
            body: "invalid api key".to_string()
        }
        .is_retryable());
        assert!(!LlmError::EmptyCompletion.is_retryable());
        assert!(!LlmError::Malformed("no choices".to_string()).is_retryable());
    }
}
