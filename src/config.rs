//! Client configuration.
//!
//! Defaults cover a local backend. Every setting can be overridden from the
//! environment (`CHATLINE_*`) or with the builder methods.
//!
//! # Example
//!
//! ```
//! use chatline::config::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("http://chat.internal:8000")
//!     .with_idle_timeout(Some(Duration::from_secs(60)));
//! assert_eq!(config.chat_url(), "http://chat.internal:8000/chat");
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Transient status shown while waiting for the first token.
pub const DEFAULT_THINKING_TEXT: &str = "Thinking...";

/// Text that replaces a failed assistant reply.
pub const DEFAULT_ERROR_TEXT: &str = "Sorry, something went wrong. Please try again.";

/// Upper bound on a single NDJSON line.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

pub const ENV_BASE_URL: &str = "CHATLINE_BASE_URL";
pub const ENV_IDLE_TIMEOUT_SECS: &str = "CHATLINE_IDLE_TIMEOUT_SECS";
pub const ENV_MAX_LINE_BYTES: &str = "CHATLINE_MAX_LINE_BYTES";
pub const ENV_STATE_PATH: &str = "CHATLINE_STATE_PATH";

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: String, value: String },

    #[error("base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("max line size must be greater than zero")]
    ZeroLineLimit,
}

/// Runtime settings for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL; requests go to `<base_url>/chat`
    pub base_url: String,
    /// Transient status set when a turn starts
    pub thinking_text: String,
    /// Fixed text written into a failed assistant message
    pub error_text: String,
    /// Fail the turn when the response, or the next chunk, takes longer than
    /// this (None = wait forever)
    pub idle_timeout: Option<Duration>,
    /// Maximum bytes buffered for one line before the stream is failed
    pub max_line_bytes: usize,
    /// Where the conversation id is persisted (None = default location)
    pub state_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            thinking_text: DEFAULT_THINKING_TEXT.to_string(),
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            idle_timeout: None,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            state_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_thinking_text(mut self, text: impl Into<String>) -> Self {
        self.thinking_text = text.into();
        self
    }

    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = text.into();
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_max_line_bytes(mut self, limit: usize) -> Self {
        self.max_line_bytes = limit;
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    /// Full URL of the streaming chat endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }

    /// Load defaults, then apply any `CHATLINE_*` environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_IDLE_TIMEOUT_SECS) {
            let secs = parse_number(ENV_IDLE_TIMEOUT_SECS, &raw)?;
            // 0 keeps the timeout disabled
            config.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(ENV_MAX_LINE_BYTES) {
            config.max_line_bytes = parse_number(ENV_MAX_LINE_BYTES, &raw)? as usize;
        }

        if let Some(path) = lookup(ENV_STATE_PATH).filter(|v| !v.trim().is_empty()) {
            config.state_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.max_line_bytes == 0 {
            return Err(ConfigError::ZeroLineLimit);
        }
        Ok(())
    }
}

fn parse_number(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            var: var.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.thinking_text, DEFAULT_THINKING_TEXT);
        assert_eq!(config.error_text, DEFAULT_ERROR_TEXT);
        assert_eq!(config.idle_timeout, None);
        assert_eq!(config.max_line_bytes, DEFAULT_MAX_LINE_BYTES);
        assert!(config.state_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::new()
            .with_base_url("https://example.com/api/")
            .with_thinking_text("...")
            .with_error_text("oops")
            .with_idle_timeout(Some(Duration::from_secs(5)))
            .with_max_line_bytes(64)
            .with_state_path("/tmp/state.json");

        assert_eq!(config.chat_url(), "https://example.com/api/chat");
        assert_eq!(config.thinking_text, "...");
        assert_eq!(config.error_text, "oops");
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_line_bytes, 64);
        assert_eq!(config.state_path, Some(PathBuf::from("/tmp/state.json")));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, " http://10.0.0.2:9000 "),
            (ENV_IDLE_TIMEOUT_SECS, "45"),
            (ENV_MAX_LINE_BYTES, "4096"),
            (ENV_STATE_PATH, "/var/lib/chatline/state.json"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.max_line_bytes, 4096);
        assert_eq!(
            config.state_path,
            Some(PathBuf::from("/var/lib/chatline/state.json"))
        );
    }

    #[test]
    fn test_zero_idle_timeout_disables() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[(ENV_IDLE_TIMEOUT_SECS, "0")])).unwrap();
        assert_eq!(config.idle_timeout, None);
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err =
            ClientConfig::from_lookup(lookup_from(&[(ENV_MAX_LINE_BYTES, "big")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: ENV_MAX_LINE_BYTES.to_string(),
                value: "big".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "localhost:8000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_zero_line_limit_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_MAX_LINE_BYTES, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroLineLimit);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var(ENV_BASE_URL, "https://env.example.com");
        std::env::remove_var(ENV_IDLE_TIMEOUT_SECS);
        std::env::remove_var(ENV_MAX_LINE_BYTES);
        std::env::remove_var(ENV_STATE_PATH);

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://env.example.com");

        std::env::remove_var(ENV_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_uses_defaults() {
        for var in [
            ENV_BASE_URL,
            ENV_IDLE_TIMEOUT_SECS,
            ENV_MAX_LINE_BYTES,
            ENV_STATE_PATH,
        ] {
            std::env::remove_var(var);
        }
        assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());
    }
}
