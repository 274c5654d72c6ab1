use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config at '{path}': expected {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("Invalid config at '{path}': {message}")]
    Invalid { path: String, message: String },

    #[error("Missing required credential '{key}' (set {env} or add it to the secrets file)")]
    MissingCredential { key: &'static str, env: &'static str },
}

impl ConfigError {
    pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }
}
