use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::error::LlmError;
use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::config::LlmSettings;

/// Client for OpenAI-compatible `/chat/completions` endpoints (Groq by
/// default).
#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(base_url: String, model: String, api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            client,
        })
    }

    pub fn from_settings(settings: &LlmSettings, api_key: &str) -> Result<Self, LlmError> {
        Self::new(
            settings.base_url.clone(),
            settings.model.clone(),
            api_key.to_string(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }
        body
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(&request);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        extract_completion(&payload)
    }
}

fn extract_completion(payload: &Value) -> Result<String, LlmError> {
    let content = payload["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| LlmError::Malformed("missing choices[0].message.content".to_string()))?;

    let content = content.trim();
    if content.is_empty() {
        return Err(LlmError::EmptyCompletion);
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatMessage;

    #[test]
    fn request_body_includes_optional_sampling_fields() {
        let provider = OpenAiCompatibleProvider::new(
            "https://api.groq.com/openai/v1/".to_string(),
            "llama-3.1-8b-instant".to_string(),
            "gsk_test".to_string(),
        )
        .expect("client builds");

        let request = ChatRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hello"),
        ])
        .with_sampling(Some(0.2), None);
        let body = provider.request_body(&request);

        assert_eq!(body["model"], json!("llama-3.1-8b-instant"));
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][1]["content"], json!("hello"));
        assert_eq!(body["temperature"], json!(0.2));
        assert!(body.get("max_tokens").is_none());
        assert_eq!(provider.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn extract_completion_reads_first_choice() {
        let payload = json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Hi there!  " } }]
        });
        assert_eq!(extract_completion(&payload).ok().as_deref(), Some("Hi there!"));
    }

    #[test]
    fn extract_completion_rejects_missing_or_blank_content() {
        assert!(matches!(
            extract_completion(&json!({ "choices": [] })),
            Err(LlmError::Malformed(_))
        ));
        assert!(matches!(
            extract_completion(&json!({ "choices": [{ "message": { "content": " " } }] })),
            Err(LlmError::EmptyCompletion)
        ));
    }
}
