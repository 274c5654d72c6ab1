use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::classifier::GreetingClassifier;
use super::error::ChatError;
use super::prompt::PromptComposer;
use crate::core::config::{ChatSettings, LlmSettings, RetrievalSettings};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::rag::RetrievalService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRoute {
    Greeting,
    Support,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub route: ChatRoute,
    /// Number of FAQs used as context (always 0 for greetings).
    pub context_faqs: usize,
}

pub struct ChatOrchestrator {
    classifier: GreetingClassifier,
    greeting_fallback: String,
    retrieval: Arc<RetrievalService>,
    retrieval_settings: RetrievalSettings,
    llm: Arc<dyn LlmProvider>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl ChatOrchestrator {
    pub fn new(
        chat: &ChatSettings,
        retrieval_settings: RetrievalSettings,
        llm_settings: &LlmSettings,
        retrieval: Arc<RetrievalService>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            classifier: GreetingClassifier::new(&chat.greetings),
            greeting_fallback: chat.greeting_fallback.clone(),
            retrieval,
            retrieval_settings,
            llm,
            temperature: llm_settings.temperature,
            max_tokens: llm_settings.max_tokens,
        }
    }

    /// Handles one stateless chat turn. The query is forwarded to the model
    /// exactly as received.
    pub async fn respond(&self, query: &str) -> Result<ChatReply, ChatError> {
        if query.trim().is_empty() {
            return Err(ChatError::Validation);
        }

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("chat_turn", %request_id);

        async move {
            if self.classifier.is_greeting(query) {
                Ok(self.greet(query).await)
            } else {
                self.answer(query).await
            }
        }
        .instrument(span)
        .await
    }

    async fn greet(&self, text: &str) -> ChatReply {
        tracing::info!("Routing to greeting branch");
        let text = match self.generate(PromptComposer::greeting(text)).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("Greeting generation failed, using fallback: {}", err);
                self.greeting_fallback.clone()
            }
        };
        ChatReply {
            text,
            route: ChatRoute::Greeting,
            context_faqs: 0,
        }
    }

    async fn answer(&self, question: &str) -> Result<ChatReply, ChatError> {
        let faqs = if self.retrieval_settings.enabled {
            self.retrieval
                .search(
                    question,
                    self.retrieval_settings.k,
                    self.retrieval_settings.score_threshold,
                )
                .await
        } else {
            Vec::new()
        };
        tracing::info!(
            retrieval_enabled = self.retrieval_settings.enabled,
            matches = faqs.len(),
            "Routing to support branch"
        );

        let context = PromptComposer::format_context(&faqs);
        let text = self
            .generate(PromptComposer::support(&context, question))
            .await
            .map_err(|err| {
                tracing::error!("Support answer generation failed: {}", err);
                ChatError::UpstreamGeneration(err.to_string())
            })?;

        Ok(ChatReply {
            text,
            route: ChatRoute::Support,
            context_faqs: faqs.len(),
        })
    }

    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String, crate::llm::LlmError> {
        let request =
            ChatRequest::new(messages).with_sampling(self.temperature, self.max_tokens);
        self.llm.chat(request).await
    }
}
