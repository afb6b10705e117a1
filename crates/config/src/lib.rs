//! Configuration loading, validation, and management for UniHelp.
//!
//! Loads configuration from `~/.unihelp/config.toml` with environment
//! variable overrides. Validates all settings at startup. Absence of the
//! completion API key never fails loading — it only degrades the
//! completion requester to the missing-credential path.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.unihelp/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion endpoint configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Identity provider configuration
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Chat pipeline tuning
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("completion", &self.completion)
            .field("store", &self.store)
            .field("identity", &self.identity)
            .field("chat", &self.chat)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// API key for the completion endpoint. Optional: absence degrades to
    /// the missing-credential failure path, it never blocks startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the generative-language service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name appended to the URL path
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "memory" (demo) or "sqlite"
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Database path for the sqlite backend
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_backend() -> String {
    "memory".into()
}
fn default_store_path() -> String {
    "unihelp.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// "demo" (accept any credentials, local-only) or "rest"
    #[serde(default = "default_identity_mode")]
    pub mode: String,

    /// API key for the REST identity provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider-specific settings (varies by backend)
    #[serde(flatten)]
    pub settings: HashMap<String, serde_json::Value>,
}

fn default_identity_mode() -> String {
    "demo".into()
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("mode", &self.mode)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            mode: default_identity_mode(),
            api_key: None,
            settings: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum evaluation records fetched into the knowledge block
    #[serde(default = "default_knowledge_limit")]
    pub knowledge_limit: usize,

    /// Sliding window of transcript messages serialized into the prompt
    #[serde(default = "default_transcript_window")]
    pub transcript_window: usize,

    /// Probability of injecting a validation prompt after a successful turn
    #[serde(default = "default_validation_probability")]
    pub validation_probability: f64,

    /// Delay before the injected validation prompt appears
    #[serde(default = "default_validation_delay_ms")]
    pub validation_delay_ms: u64,
}

fn default_knowledge_limit() -> usize {
    10
}
fn default_transcript_window() -> usize {
    20
}
fn default_validation_probability() -> f64 {
    0.3
}
fn default_validation_delay_ms() -> u64 {
    1500
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            knowledge_limit: default_knowledge_limit(),
            transcript_window: default_transcript_window(),
            validation_probability: default_validation_probability(),
            validation_delay_ms: default_validation_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.unihelp/config.toml).
    ///
    /// Also checks environment variables for the completion credential:
    /// - `UNIHELP_API_KEY` (highest priority)
    /// - `GEMINI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.completion.api_key.is_none() {
            config.completion.api_key = std::env::var("UNIHELP_API_KEY")
                .ok()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("UNIHELP_MODEL") {
            config.completion.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".unihelp")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.chat.validation_probability) {
            return Err(ConfigError::ValidationError(
                "chat.validation_probability must be between 0.0 and 1.0".into(),
            ));
        }

        if self.chat.knowledge_limit == 0 {
            return Err(ConfigError::ValidationError(
                "chat.knowledge_limit must be > 0".into(),
            ));
        }

        if self.chat.transcript_window == 0 {
            return Err(ConfigError::ValidationError(
                "chat.transcript_window must be > 0".into(),
            ));
        }

        match self.store.backend.as_str() {
            "memory" | "sqlite" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown store backend: {other}"
                )))
            }
        }

        Ok(())
    }

    /// Check if a completion credential is available.
    pub fn has_completion_key(&self) -> bool {
        self.completion.api_key.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            store: StoreConfig::default(),
            identity: IdentityConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
