//! Core types for LLM requests and responses.

use serde::Serialize;
use serde_json::Value;

/// A request to the content-generation API.
#[derive(Debug, Clone, Serialize)]
pub struct LlmRequest {
    /// Full prompt text.
    pub prompt: String,
    /// JSON schema the answer must follow. Switches the provider to JSON mode.
    pub response_schema: Option<Value>,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
}

impl LlmRequest {
    /// Free-text request.
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
            temperature: 0.7,
            timeout_ms: 30_000,
        }
    }

    /// Structured request answered as JSON matching `schema`.
    #[must_use]
    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            response_schema: Some(schema),
            temperature: 1.0,
            ..Self::text(prompt)
        }
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A response from the content-generation API.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated text.
    pub text: String,
    /// Latency of the successful attempt in milliseconds.
    pub latency_ms: u64,
    /// How many HTTP attempts it took.
    pub attempts: u32,
    /// Which model answered.
    pub model: String,
}
