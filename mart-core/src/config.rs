//! Configuration for Memory Mart.
//!
//! Maps directly to `memory-mart.toml`. Every field has a default, so an
//! empty file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MartConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Round timing and hint budget.
    #[serde(default)]
    pub game: GameConfig,
    /// Content-generation API settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// API-key storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl MartConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MartError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::MartError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_or_default(path: &Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

/// Round timing and hint budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seconds the ordered items stay on screen.
    #[serde(default = "default_10")]
    pub observation_secs: u32,
    /// Hints per round (Normal and Hard only).
    #[serde(default = "default_1")]
    pub hints_per_round: u32,
    /// Seconds the hint overlay stays up.
    #[serde(default = "default_3")]
    pub hint_display_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            observation_secs: 10,
            hints_per_round: 1,
            hint_display_secs: 3,
        }
    }
}

/// Content-generation API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "gemini", "openai", "none".
    #[serde(default = "default_gemini")]
    pub provider: String,
    /// Base URL for the API.
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Hard timeout for a single HTTP attempt in milliseconds.
    #[serde(default = "default_30000")]
    pub request_timeout_ms: u64,
    /// Retries after a transient failure (503, 429, timeout).
    #[serde(default = "default_3")]
    pub max_retries: u32,
    /// First backoff delay; doubles on each retry.
    #[serde(default = "default_1000")]
    pub initial_backoff_ms: u64,
    /// Generate the next scenario in the background while in the lobby.
    #[serde(default = "default_true")]
    pub prefetch: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_gemini(),
            base_url: default_gemini_url(),
            model: default_model(),
            request_timeout_ms: 30_000,
            max_retries: 3,
            initial_backoff_ms: 1000,
            prefetch: true,
        }
    }
}

/// Where the API key lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the saved key.
    #[serde(default = "default_key_file")]
    pub key_file: String,
    /// Environment variable consulted when no key is saved.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_file: default_key_file(),
            api_key_env: default_api_key_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_gemini() -> String { "gemini".to_string() }
fn default_gemini_url() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_model() -> String { "gemini-3-flash-preview".to_string() }
fn default_key_file() -> String { "memory-mart-key.json".to_string() }
fn default_api_key_env() -> String { "API_KEY".to_string() }
fn default_1() -> u32 { 1 }
fn default_3() -> u32 { 3 }
fn default_10() -> u32 { 10 }
fn default_1000() -> u64 { 1000 }
fn default_30000() -> u64 { 30_000 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = MartConfig::from_toml("").expect("empty is valid");
        assert_eq!(cfg.game.observation_secs, 10);
        assert_eq!(cfg.game.hints_per_round, 1);
        assert_eq!(cfg.llm.max_retries, 3);
        assert_eq!(cfg.llm.initial_backoff_ms, 1000);
        assert_eq!(cfg.llm.model, "gemini-3-flash-preview");
        assert_eq!(cfg.storage.api_key_env, "API_KEY");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = MartConfig::from_toml(
            r#"
            [game]
            observation_secs = 15

            [llm]
            provider = "openai"
            base_url = "http://localhost:8080"
            "#,
        )
        .expect("valid toml");
        assert_eq!(cfg.game.observation_secs, 15);
        assert_eq!(cfg.game.hint_display_secs, 3);
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.max_retries, 3);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = MartConfig::from_toml("[game\nobservation_secs = 1").expect_err("unterminated table");
        assert!(matches!(err, crate::MartError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = MartConfig::load_or_default(Path::new("/nonexistent/memory-mart.toml"))
            .expect("defaults");
        assert!(cfg.llm.prefetch);
    }
}
