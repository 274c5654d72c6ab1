use serde_json::{Map, Value};

use super::error::ConfigError;

pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 0, 65_535)?;
        validate_string_array_field(
            server,
            "server.cors_allowed_origins",
            "cors_allowed_origins",
        )?;
        validate_optional_string_field(server, "server.admin_token", "admin_token")?;
    }

    if let Some(chat) = expect_optional_object(root, "chat")? {
        validate_string_array_field(chat, "chat.greetings", "greetings")?;
        validate_optional_string_field(chat, "chat.greeting_fallback", "greeting_fallback")?;
    }

    if let Some(retrieval) = expect_optional_object(root, "retrieval")? {
        validate_bool_field(retrieval, "retrieval.enabled", "enabled")?;
        validate_u64_field(retrieval, "retrieval.k", "k", 1, 100)?;
        validate_f64_field(
            retrieval,
            "retrieval.score_threshold",
            "score_threshold",
            0.0,
            1.0,
        )?;
    }

    if let Some(llm) = expect_optional_object(root, "llm")? {
        validate_optional_string_field(llm, "llm.base_url", "base_url")?;
        validate_optional_string_field(llm, "llm.model", "model")?;
        validate_optional_string_field(llm, "llm.api_key", "api_key")?;
        validate_u64_field(llm, "llm.timeout_secs", "timeout_secs", 1, 3_600)?;
        validate_u64_field(llm, "llm.max_attempts", "max_attempts", 1, 10)?;
        validate_u64_field(
            llm,
            "llm.initial_backoff_ms",
            "initial_backoff_ms",
            1,
            60_000,
        )?;
        validate_u64_field(llm, "llm.max_backoff_ms", "max_backoff_ms", 1, 600_000)?;
        validate_f64_field(llm, "llm.temperature", "temperature", 0.0, 2.0)?;
        validate_u64_field(llm, "llm.max_tokens", "max_tokens", 1, 1_000_000)?;
    }

    if let Some(embedding) = expect_optional_object(root, "embedding")? {
        if let Some(provider) = embedding.get("provider") {
            match provider.as_str() {
                Some("hash") | Some("openai") => {}
                Some(other) => {
                    return Err(ConfigError::invalid(
                        "embedding.provider",
                        format!("unknown provider '{}' (expected 'hash' or 'openai')", other),
                    ))
                }
                None => return Err(config_type_error("embedding.provider", "string")),
            }
        }
        validate_u64_field(embedding, "embedding.dimensions", "dimensions", 8, 65_536)?;
        validate_optional_string_field(embedding, "embedding.base_url", "base_url")?;
        validate_optional_string_field(embedding, "embedding.model", "model")?;
        validate_optional_string_field(embedding, "embedding.api_key", "api_key")?;
        validate_u64_field(
            embedding,
            "embedding.timeout_secs",
            "timeout_secs",
            1,
            3_600,
        )?;
    }

    if let Some(faq) = expect_optional_object(root, "faq")? {
        validate_optional_string_field(faq, "faq.source_path", "source_path")?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(config_type_error(key, "object")),
        None => Ok(None),
    }
}

fn validate_bool_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.as_bool().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "boolean"))
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_f64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_f64() else {
        return Err(config_type_error(path, "number"));
    };
    if !(min..=max).contains(&number) {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() || value.as_str().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "string"))
}

fn validate_string_array_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(items) = value.as_array() else {
        return Err(config_type_error(path, "array of strings"));
    };
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_str() else {
            return Err(config_type_error(&format!("{}[{}]", path, index), "string"));
        };
        if text.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("{}[{}]", path, index),
                "value cannot be empty",
            ));
        }
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &'static str) -> ConfigError {
    ConfigError::WrongType {
        path: path.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_empty_and_complete_configs() {
        assert!(validate_config(&json!({})).is_ok());

        let full = json!({
            "server": { "host": "0.0.0.0", "port": 8000, "cors_allowed_origins": ["http://localhost:8501"] },
            "chat": { "greetings": ["hi", "hello"], "greeting_fallback": "Hi!" },
            "retrieval": { "enabled": true, "k": 3, "score_threshold": 0.2 },
            "llm": { "model": "llama-3.1-8b-instant", "timeout_secs": 30, "max_attempts": 3, "temperature": 0.3 },
            "embedding": { "provider": "hash", "dimensions": 256 },
            "faq": { "source_path": "faqs.yaml" }
        });
        assert!(validate_config(&full).is_ok());
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        let err = validate_config(&json!({ "retrieval": { "score_threshold": 1.5 } }))
            .expect_err("threshold above 1 must fail");
        assert!(err.to_string().contains("retrieval.score_threshold"));

        let err = validate_config(&json!({ "retrieval": { "score_threshold": "high" } }))
            .expect_err("non-numeric threshold must fail");
        assert!(matches!(err, ConfigError::WrongType { expected: "number", .. }));
    }

    #[test]
    fn rejects_zero_k_and_blank_greeting() {
        assert!(validate_config(&json!({ "retrieval": { "k": 0 } })).is_err());

        let err = validate_config(&json!({ "chat": { "greetings": ["hi", "  "] } }))
            .expect_err("blank greeting must fail");
        assert!(err.to_string().contains("chat.greetings[1]"));
    }

    #[test]
    fn rejects_unknown_embedding_provider() {
        let err = validate_config(&json!({ "embedding": { "provider": "faiss" } }))
            .expect_err("unknown provider must fail");
        assert!(err.to_string().contains("faiss"));
    }

    #[test]
    fn rejects_non_object_sections() {
        let err = validate_config(&json!({ "llm": "groq" })).expect_err("llm must be object");
        assert!(matches!(err, ConfigError::WrongType { ref path, .. } if path == "llm"));
    }
}
