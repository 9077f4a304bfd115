//! Client settings: built-in defaults, then an optional TOML file, then the
//! `--server` flag / `HWP_CONVERTER_SERVER` variable.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the conversion service, without the `/api` suffix.
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub toast_visible_ms: u64,
    pub toast_fade_ms: u64,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_ms: 500,
            toast_visible_ms: 3000,
            toast_fade_ms: 300,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// `<config dir>/hwp-converter/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hwp-converter").join("config.toml"))
    }

    /// Loads `path` if given (it must exist), otherwise the default location if present,
    /// otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        info!(path = %path.display(), "loading config file");
        let content = fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_server_override(mut self, server: Option<String>) -> Result<Self, ConfigError> {
        if let Some(server) = server {
            self.server_url = server;
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidServerUrl(self.server_url.clone()))
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn toast_visible(&self) -> Duration {
        Duration::from_millis(self.toast_visible_ms)
    }

    pub fn toast_fade(&self) -> Duration {
        Duration::from_millis(self.toast_fade_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.toast_visible(), Duration::from_secs(3));
        assert_eq!(config.toast_fade(), Duration::from_millis(300));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = ClientConfig::from_toml_str(
            r#"
            server_url = "https://convert.example.org"
            request_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.server_url, "https://convert.example.org");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn rejects_non_http_server_url() {
        let err = ClientConfig::from_toml_str(r#"server_url = "localhost:5000""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidServerUrl(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ClientConfig::from_toml_str("poll_interval_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn server_override_wins_and_is_validated() {
        let config = ClientConfig::default()
            .with_server_override(Some("http://10.0.0.5:5000".to_string()))
            .unwrap();
        assert_eq!(config.server_url, "http://10.0.0.5:5000");

        let err = ClientConfig::default()
            .with_server_override(Some("ftp://nope".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidServerUrl(_)));
    }

    #[test]
    fn load_reads_an_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "poll_interval_ms = 250\n").unwrap();

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn load_fails_when_explicit_path_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
