use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx reply. `message` is the server's `error` field when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("unexpected response from server: {0}")]
    InvalidResponse(String),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Text shown to the user for a failed submission.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("server url must start with http:// or https://, got '{0}'")]
    InvalidServerUrl(String),
}
