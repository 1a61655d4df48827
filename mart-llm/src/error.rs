//! LLM error types.

use thiserror::Error;

/// Errors that can occur while talking to the content-generation API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed before a response arrived.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// The API answered with a non-success status that is not worth retrying.
    #[error("LLM API returned HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// LLM response was not valid JSON or did not match the scenario shape.
    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    /// LLM provider is unavailable.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    /// All retry attempts exhausted.
    #[error("All LLM retry attempts exhausted after {attempts} tries: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        last_error: String,
    },

    /// No API key was saved, typed, or found in the environment.
    #[error("API key is not configured")]
    MissingApiKey,

    /// Configuration error.
    #[error("LLM configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}

impl LlmError {
    /// Whether the player needs to fix their key or provider settings.
    #[must_use]
    pub fn needs_key_setup(&self) -> bool {
        match self {
            LlmError::MissingApiKey => true,
            LlmError::Http { status, .. } => matches!(status, 400 | 401 | 403),
            _ => false,
        }
    }
}
