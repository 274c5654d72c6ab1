use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::chat::{ChatError, ChatOrchestrator};
use crate::core::config::{AppPaths, AppSettings, ConfigService};
use crate::core::security::AdminToken;
use crate::faq::{FaqSource, FileFaqSource, StaticFaqSource};
use crate::llm::{build_llm_provider, LlmProvider};
use crate::rag::{build_embedding_provider, IndexStats, RetrievalService};

pub mod error;

pub use error::{InitializationError, ReindexError};

/// Application-scoped state, assembled once at startup and shared by every
/// request handler.
///
/// The chat orchestrator is only present when the LLM client could be
/// configured; otherwise the configuration error is kept and reported to
/// each chat caller.
#[derive(Clone)]
pub struct AppState {
    pub config: ConfigService,
    pub settings: Arc<AppSettings>,
    pub admin_token: AdminToken,
    pub retrieval: Arc<RetrievalService>,
    pub faq_source: Arc<dyn FaqSource>,
    chat: Result<Arc<ChatOrchestrator>, String>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Loads settings, builds the embedding and LLM clients, then indexes the
    /// configured FAQ corpus.
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths);
        let settings = config.load_settings()?;

        let embedder = build_embedding_provider(&settings.embedding)?;
        tracing::info!(embedder = embedder.name(), "Embedding provider ready");
        let retrieval = Arc::new(RetrievalService::new(embedder));

        let faq_source: Arc<dyn FaqSource> = match &settings.faq.source_path {
            Some(path) => Arc::new(FileFaqSource::new(path.clone())),
            None => Arc::new(StaticFaqSource::sample()),
        };

        let llm = build_llm_provider(&settings.llm).map_err(|e| {
            tracing::error!("Chat is unavailable: {}", e);
            e.to_string()
        });

        let state = Self::from_parts(config, settings, retrieval, faq_source, llm);

        let faqs = state.faq_source.load()?;
        match state.retrieval.index(&faqs).await {
            Ok(stats) => tracing::info!(
                faq_count = stats.faq_count,
                source = %state.faq_source.describe(),
                "FAQ index built"
            ),
            // Chat keeps working with the no-match context.
            Err(e) => tracing::error!("Initial FAQ indexing failed: {}", e),
        }

        Ok(Arc::new(state))
    }

    /// Wires already-built components together. Does not index anything.
    pub fn from_parts(
        config: ConfigService,
        settings: AppSettings,
        retrieval: Arc<RetrievalService>,
        faq_source: Arc<dyn FaqSource>,
        llm: Result<Arc<dyn LlmProvider>, String>,
    ) -> Self {
        let chat = llm.map(|llm| {
            Arc::new(ChatOrchestrator::new(
                &settings.chat,
                settings.retrieval,
                &settings.llm,
                retrieval.clone(),
                llm,
            ))
        });

        Self {
            config,
            admin_token: AdminToken::new(settings.server.admin_token.clone()),
            settings: Arc::new(settings),
            retrieval,
            faq_source,
            chat,
            started_at: Utc::now(),
        }
    }

    pub fn chat(&self) -> Result<&ChatOrchestrator, ChatError> {
        match &self.chat {
            Ok(orchestrator) => Ok(orchestrator.as_ref()),
            Err(cause) => Err(ChatError::Configuration(cause.clone())),
        }
    }

    pub fn chat_ready(&self) -> bool {
        self.chat.is_ok()
    }

    /// Reloads the FAQ source and swaps in a fresh index. The previous index
    /// stays active if either step fails.
    pub async fn reload_faqs(&self) -> Result<IndexStats, ReindexError> {
        let faqs = self.faq_source.load()?;
        let stats = self.retrieval.index(&faqs).await?;
        tracing::info!(
            faq_count = stats.faq_count,
            source = %self.faq_source.describe(),
            "FAQ index rebuilt"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faq::Faq;
    use crate::rag::HashEmbeddingProvider;
    use tempfile::tempdir;

    fn state_with(
        source: Arc<dyn FaqSource>,
        llm: Result<Arc<dyn LlmProvider>, String>,
    ) -> (AppState, tempfile::TempDir) {
        let dir = tempdir().expect("tempdir");
        let paths = Arc::new(AppPaths::with_dirs(
            dir.path().join("root"),
            dir.path().join("data"),
        ));
        let retrieval = Arc::new(RetrievalService::new(Arc::new(
            HashEmbeddingProvider::default(),
        )));
        let state = AppState::from_parts(
            ConfigService::new(paths),
            AppSettings::default(),
            retrieval,
            source,
            llm,
        );
        (state, dir)
    }

    #[tokio::test]
    async fn missing_llm_reports_configuration_error() {
        let (state, _dir) = state_with(
            Arc::new(StaticFaqSource::sample()),
            Err("Missing required credential 'llm.api_key'".to_string()),
        );

        assert!(!state.chat_ready());
        let err = state.chat().err().expect("chat unavailable");
        assert_eq!(
            err.to_string(),
            "Chatbot not properly initialized: Missing required credential 'llm.api_key'"
        );
    }

    #[tokio::test]
    async fn reload_indexes_source() {
        let (state, _dir) = state_with(
            Arc::new(StaticFaqSource::sample()),
            Err("no llm".to_string()),
        );

        let stats = state.reload_faqs().await.expect("reload");
        assert_eq!(stats.faq_count, 14);
        assert_eq!(state.retrieval.faqs().await.len(), 14);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_index() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("faqs.yaml");
        std::fs::write(&path, "- question: Q1\n  answer: A1\n").expect("write");

        let (state, _state_dir) =
            state_with(Arc::new(FileFaqSource::new(&path)), Err("no llm".to_string()));
        state.reload_faqs().await.expect("first load");

        std::fs::write(&path, "- question: Q2\n  answer: ''\n").expect("write");
        assert!(matches!(
            state.reload_faqs().await,
            Err(ReindexError::Source(_))
        ));
        assert_eq!(state.retrieval.faqs().await, vec![Faq::new("Q1", "A1")]);
    }
}
