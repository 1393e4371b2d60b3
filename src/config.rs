//! Environment-driven configuration.
//!
//! Every knob has a default except the completion backend token, which
//! is checked when the backend is built so a missing credential fails
//! at startup rather than mid-pipeline.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::summarize::SummarizerConfig;

pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 16 * 1024 * 1024;
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &["pdf", "png", "jpg", "jpeg", "tiff", "bmp", "txt"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN is not set; the completion backend requires an API token")]
    MissingApiToken,

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Completion backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub endpoint: String,
    pub model: String,
    /// Absence is tolerated here and rejected when the backend is built.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            token: None,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// Lowercased extensions accepted by the upload endpoint.
    pub allowed_extensions: BTreeSet<String>,
    /// Bearer token required on protected endpoints; `None` disables auth.
    pub api_token: Option<String>,
    pub backend: BackendConfig,
    pub summarizer: SummarizerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_CONTENT_LENGTH,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            api_token: None,
            backend: BackendConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(dir) = std::env::var("UPLOAD_FOLDER") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(bytes) = parse_var::<u64>("MAX_CONTENT_LENGTH")? {
            config.max_upload_bytes = bytes;
        }
        if let Ok(list) = std::env::var("ALLOWED_EXTENSIONS") {
            config.allowed_extensions = list
                .split(',')
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect();
        }
        if let Ok(token) = std::env::var("API_TOKEN") {
            if !token.is_empty() {
                config.api_token = Some(token);
            }
        }

        if let Ok(endpoint) = std::env::var("GITHUB_MODELS_ENDPOINT") {
            config.backend.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("GITHUB_MODELS_MODEL") {
            config.backend.model = model;
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                config.backend.token = Some(token);
            }
        }
        if let Some(secs) = parse_var::<u64>("LLM_TIMEOUT_SECONDS")? {
            config.backend.timeout_secs = secs;
        }

        if let Some(tokens) = parse_var::<usize>("MAX_CHUNK_TOKENS")? {
            config.summarizer.max_chunk_tokens = tokens;
        }
        if let Some(secs) = parse_var::<u64>("CHUNK_DELAY_SECONDS")? {
            config.summarizer.chunk_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("RATE_LIMIT_RETRY_DELAY")? {
            config.summarizer.rate_limit_cooldown = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn extension_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions
            .contains(&extension.to_ascii_lowercase())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert!(config.extension_allowed("pdf"));
        assert!(config.extension_allowed("PDF"));
        assert!(!config.extension_allowed("exe"));
        assert!(config.api_token.is_none());
        assert_eq!(config.backend.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.summarizer.max_chunk_tokens, 5000);
    }

    #[test]
    fn cooldown_exceeds_chunk_delay_by_default() {
        let config = AppConfig::default();
        assert!(config.summarizer.rate_limit_cooldown > config.summarizer.chunk_delay);
    }
}
