//! Typed view over the merged YAML config.
//!
//! Values are read leniently (`validate_config` has already rejected wrong
//! types), falling back to the defaults below for anything absent.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::error::ConfigError;

pub const DEFAULT_GREETINGS: [&str; 9] = [
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "hi there",
    "hello there",
    "greetings",
];
pub const DEFAULT_GREETING_FALLBACK: &str = "Hello! How can I help you today?";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_K: usize = 3;
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.2;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_EMBEDDING_DIM: usize = 768;
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-mpnet-base-v2";

pub const LLM_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const ADMIN_TOKEN_ENV: &str = "FAQBOT_ADMIN_TOKEN";

#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    pub server: ServerSettings,
    pub chat: ChatSettings,
    pub retrieval: RetrievalSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub faq: FaqSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub greetings: Vec<String>,
    pub greeting_fallback: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RetrievalSettings {
    /// When false the orchestrator skips retrieval and always uses the
    /// "no relevant FAQ" sentinel as context.
    pub enabled: bool,
    pub k: usize,
    pub score_threshold: f32,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_attempts: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    Hash,
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub dimensions: usize,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct FaqSettings {
    pub source_path: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: Vec::new(),
            admin_token: None,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            greetings: DEFAULT_GREETINGS.iter().map(|g| g.to_string()).collect(),
            greeting_fallback: DEFAULT_GREETING_FALLBACK.to_string(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            k: DEFAULT_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hash,
            dimensions: DEFAULT_EMBEDDING_DIM,
            base_url: "http://localhost:1234/v1".to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AppSettings {
    pub fn from_value(config: &Value, project_root: &Path) -> Self {
        let defaults = AppSettings::default();

        let server = ServerSettings {
            host: string_at(config, &["server", "host"]).unwrap_or(defaults.server.host),
            port: u64_at(config, &["server", "port"])
                .and_then(|v| u16::try_from(v).ok())
                .unwrap_or(defaults.server.port),
            cors_allowed_origins: string_list_at(config, &["server", "cors_allowed_origins"])
                .unwrap_or_default(),
            admin_token: non_blank(string_at(config, &["server", "admin_token"])),
        };

        let chat = ChatSettings {
            greetings: string_list_at(config, &["chat", "greetings"])
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.chat.greetings),
            greeting_fallback: non_blank(string_at(config, &["chat", "greeting_fallback"]))
                .unwrap_or(defaults.chat.greeting_fallback),
        };

        let retrieval = RetrievalSettings {
            enabled: bool_at(config, &["retrieval", "enabled"])
                .unwrap_or(defaults.retrieval.enabled),
            k: u64_at(config, &["retrieval", "k"])
                .map(|v| v.max(1) as usize)
                .unwrap_or(defaults.retrieval.k),
            score_threshold: f64_at(config, &["retrieval", "score_threshold"])
                .map(|v| v.clamp(0.0, 1.0) as f32)
                .unwrap_or(defaults.retrieval.score_threshold),
        };

        let llm = LlmSettings {
            base_url: string_at(config, &["llm", "base_url"])
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.llm.base_url),
            model: non_blank(string_at(config, &["llm", "model"])).unwrap_or(defaults.llm.model),
            api_key: non_blank(string_at(config, &["llm", "api_key"])),
            timeout: u64_at(config, &["llm", "timeout_secs"])
                .map(Duration::from_secs)
                .unwrap_or(defaults.llm.timeout),
            max_attempts: u64_at(config, &["llm", "max_attempts"])
                .map(|v| v.max(1) as usize)
                .unwrap_or(defaults.llm.max_attempts),
            initial_backoff: u64_at(config, &["llm", "initial_backoff_ms"])
                .map(Duration::from_millis)
                .unwrap_or(defaults.llm.initial_backoff),
            max_backoff: u64_at(config, &["llm", "max_backoff_ms"])
                .map(Duration::from_millis)
                .unwrap_or(defaults.llm.max_backoff),
            temperature: f64_at(config, &["llm", "temperature"]),
            max_tokens: u64_at(config, &["llm", "max_tokens"]).map(|v| v as u32),
        };

        let embedding = EmbeddingSettings {
            backend: match string_at(config, &["embedding", "provider"]).as_deref() {
                Some("openai") => EmbeddingBackend::OpenAi,
                _ => EmbeddingBackend::Hash,
            },
            dimensions: u64_at(config, &["embedding", "dimensions"])
                .map(|v| v as usize)
                .unwrap_or(defaults.embedding.dimensions),
            base_url: string_at(config, &["embedding", "base_url"])
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.embedding.base_url),
            model: non_blank(string_at(config, &["embedding", "model"]))
                .unwrap_or(defaults.embedding.model),
            api_key: non_blank(string_at(config, &["embedding", "api_key"])),
            timeout: u64_at(config, &["embedding", "timeout_secs"])
                .map(Duration::from_secs)
                .unwrap_or(defaults.embedding.timeout),
        };

        let faq = FaqSettings {
            source_path: non_blank(string_at(config, &["faq", "source_path"])).map(|raw| {
                let candidate = PathBuf::from(raw);
                if candidate.is_absolute() {
                    candidate
                } else {
                    project_root.join(candidate)
                }
            }),
        };

        AppSettings {
            server,
            chat,
            retrieval,
            llm,
            embedding,
            faq,
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = env::var("PORT").ok().and_then(|val| val.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(key) = non_blank(env::var(LLM_API_KEY_ENV).ok()) {
            self.llm.api_key = Some(key);
        }
        if let Some(token) = non_blank(env::var(ADMIN_TOKEN_ENV).ok()) {
            self.server.admin_token = Some(token);
        }
    }
}

impl LlmSettings {
    /// The hosted model cannot be reached without a credential.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                key: "llm.api_key",
                env: LLM_API_KEY_ENV,
            })
    }
}

fn lookup<'a>(config: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(config, |current, key| current.get(*key))
}

fn string_at(config: &Value, path: &[&str]) -> Option<String> {
    lookup(config, path)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn u64_at(config: &Value, path: &[&str]) -> Option<u64> {
    lookup(config, path).and_then(|v| v.as_u64())
}

fn f64_at(config: &Value, path: &[&str]) -> Option<f64> {
    lookup(config, path).and_then(|v| v.as_f64())
}

fn bool_at(config: &Value, path: &[&str]) -> Option<bool> {
    lookup(config, path).and_then(|v| v.as_bool())
}

fn string_list_at(config: &Value, path: &[&str]) -> Option<Vec<String>> {
    lookup(config, path).and_then(|v| v.as_array()).map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| item.to_string())
            .collect()
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_yields_defaults() {
        let settings = AppSettings::from_value(&json!({}), Path::new("/srv"));

        assert_eq!(settings.server.port, DEFAULT_PORT);
        assert_eq!(settings.chat.greetings.len(), DEFAULT_GREETINGS.len());
        assert_eq!(settings.chat.greeting_fallback, DEFAULT_GREETING_FALLBACK);
        assert!(settings.retrieval.enabled);
        assert_eq!(settings.retrieval.k, 3);
        assert!((settings.retrieval.score_threshold - 0.2).abs() < f32::EPSILON);
        assert_eq!(settings.llm.model, DEFAULT_LLM_MODEL);
        assert!(settings.llm.api_key.is_none());
        assert_eq!(settings.embedding.backend, EmbeddingBackend::Hash);
        assert!(settings.faq.source_path.is_none());
    }

    #[test]
    fn reads_nested_values_and_resolves_relative_paths() {
        let config = json!({
            "server": { "port": 9000, "admin_token": "  " },
            "chat": { "greetings": ["yo", "howdy"] },
            "retrieval": { "enabled": false, "k": 5, "score_threshold": 0.35 },
            "llm": { "base_url": "http://localhost:1234/v1/", "api_key": "gsk_x", "timeout_secs": 5 },
            "embedding": { "provider": "openai", "model": "nomic-embed-text" },
            "faq": { "source_path": "data/faqs.yaml" }
        });

        let settings = AppSettings::from_value(&config, Path::new("/srv/bot"));

        assert_eq!(settings.server.port, 9000);
        assert!(settings.server.admin_token.is_none());
        assert_eq!(settings.chat.greetings, vec!["yo", "howdy"]);
        assert!(!settings.retrieval.enabled);
        assert_eq!(settings.retrieval.k, 5);
        assert_eq!(settings.llm.base_url, "http://localhost:1234/v1");
        assert_eq!(settings.llm.require_api_key().ok(), Some("gsk_x"));
        assert_eq!(settings.llm.timeout, Duration::from_secs(5));
        assert_eq!(settings.embedding.backend, EmbeddingBackend::OpenAi);
        assert_eq!(settings.embedding.model, "nomic-embed-text");
        assert_eq!(
            settings.faq.source_path,
            Some(PathBuf::from("/srv/bot/data/faqs.yaml"))
        );
    }

    #[test]
    fn missing_api_key_is_a_credential_error() {
        let settings = LlmSettings::default();
        let err = settings.require_api_key().expect_err("no key configured");
        assert!(err.to_string().contains(LLM_API_KEY_ENV));
    }
}
