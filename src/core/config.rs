//! Tracker configuration with documented defaults
//!
//! Values come from an optional TOML file, then environment overrides.
//! Every key in the file is optional.

use crate::core::error::{Result, TrackerError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default base URL of the text-generation service
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for classification and greetings
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Configuration for the tracker binary and its collaborators
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// JSON file backing the key-value store
    ///
    /// Holds the ability set, the API key, the task lists and the stats.
    pub data_file: PathBuf,

    /// Base URL of the text-generation service
    ///
    /// Gemini-style URLs use the `generateContent` API; anything else is
    /// treated as an OpenAI-compatible chat completion endpoint.
    pub api_url: String,

    /// Model name passed to the service
    pub model: String,

    /// Per-request timeout in seconds
    ///
    /// A classification that exceeds it is reported as a classifier failure,
    /// never retried.
    pub request_timeout_secs: u64,

    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("ability_tracker.json"),
            api_url: DEFAULT_API_URL.into(),
            model: DEFAULT_MODEL.into(),
            request_timeout_secs: 30,
            log_filter: "ability_tracker=info".into(),
        }
    }
}

impl TrackerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply environment overrides
    ///
    /// Optional: TRACKER_DATA_FILE, LLM_API_URL, LLM_MODEL, LLM_TIMEOUT_SECS
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(path) = std::env::var("TRACKER_DATA_FILE") {
            self.data_file = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("LLM_API_URL") {
            self.api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.model = model;
        }
        if let Ok(secs) = std::env::var("LLM_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.trim().parse().map_err(|_| {
                TrackerError::Config(format!("LLM_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        Ok(self)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(TrackerError::Config("api_url must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(TrackerError::Config("model must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(TrackerError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TrackerConfig::from_toml_str(
            r#"
            model = "gemini-2.0-flash"
            request_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.data_file, PathBuf::from("ability_tracker.json"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = TrackerConfig::from_toml_str("model = ");
        assert!(matches!(result, Err(TrackerError::TomlError(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = TrackerConfig {
            request_timeout_secs: 0,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = TrackerConfig {
            model: "  ".into(),
            ..TrackerConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrackerError::Config(_))));
    }
}
