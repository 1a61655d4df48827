//! LLM Client: unified interface for Gemini and OpenAI-compatible backends.

use std::time::{Duration, Instant};

use mart_core::config::LlmConfig;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::retry::RetryPolicy;
use crate::types::{LlmRequest, LlmResponse};

/// Provider backend for content generation.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API.
    Gemini { base_url: String, api_key: String },
    /// OpenAI-compatible chat completions API.
    OpenAiCompatible { base_url: String, api_key: String },
    /// No backend: every call fails and the caller falls back.
    None,
}

impl LlmProvider {
    fn api_key(&self) -> Option<&str> {
        match self {
            Self::Gemini { api_key, .. } | Self::OpenAiCompatible { api_key, .. } => {
                Some(api_key.as_str())
            }
            Self::None => None,
        }
    }
}

/// The client that routes requests to the configured backend.
#[derive(Debug, Clone)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    retry: RetryPolicy,
}

impl LlmClient {
    /// Create a new client.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            retry,
        }
    }

    /// Create a client with no backend (all calls fail → fallback content).
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, String::new(), RetryPolicy::none())
    }

    /// Build a client from the `[llm]` section and a resolved API key.
    ///
    /// A missing key is not an error here; it surfaces as
    /// [`LlmError::MissingApiKey`] on the first call.
    ///
    /// # Errors
    /// Returns `ConfigError` for an unknown provider name.
    pub fn from_config(config: &LlmConfig, api_key: Option<String>) -> Result<Self, LlmError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let api_key = api_key.unwrap_or_default();
        let provider = match config.provider.as_str() {
            "gemini" => LlmProvider::Gemini { base_url, api_key },
            "openai" => LlmProvider::OpenAiCompatible { base_url, api_key },
            "none" => LlmProvider::None,
            other => {
                return Err(LlmError::ConfigError(format!("unknown provider '{other}'")));
            }
        };
        Ok(Self::new(provider, &config.model, RetryPolicy::from_config(config)))
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Generate a response.
    ///
    /// Returns `Err` if the backend is unavailable, the key is missing, the
    /// API rejects the call, or every retry fails.
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        if self.provider.api_key().is_some_and(|k| k.trim().is_empty()) {
            return Err(LlmError::MissingApiKey);
        }
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("No LLM provider configured".into())),
            LlmProvider::Gemini { base_url, api_key } => {
                self.generate_gemini(base_url, api_key, request).await
            }
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                self.generate_openai(base_url, api_key, request).await
            }
        }
    }

    /// Generate using Gemini's `generateContent`.
    async fn generate_gemini(
        &self,
        base_url: &str,
        api_key: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{base_url}/v1beta/models/{}:generateContent", self.model);
        let mut body = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": request.prompt } ] }
            ],
            "generationConfig": {
                "temperature": request.temperature,
            }
        });
        if let Some(schema) = &request.response_schema {
            body["generationConfig"]["responseMimeType"] = json!("application/json");
            body["generationConfig"]["responseSchema"] = schema.clone();
        }

        let (json, attempts, latency_ms) = self
            .send_with_retry("Gemini", request.timeout_ms, || {
                self.http.post(&url).header("x-goog-api-key", api_key).json(&body)
            })
            .await?;

        let text = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string();

        Ok(LlmResponse { text, latency_ms, attempts, model: self.model.clone() })
    }

    /// Generate using an OpenAI-compatible API.
    async fn generate_openai(
        &self,
        base_url: &str,
        api_key: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{base_url}/v1/chat/completions");
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": request.prompt },
            ],
            "temperature": request.temperature,
        });
        if request.response_schema.is_some() {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let (json, attempts, latency_ms) = self
            .send_with_retry("OpenAI", request.timeout_ms, || {
                self.http
                    .post(&url)
                    .header("Authorization", format!("Bearer {api_key}"))
                    .json(&body)
            })
            .await?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();

        Ok(LlmResponse { text, latency_ms, attempts, model: self.model.clone() })
    }

    /// Send a request, retrying 503/429 and timeouts with backoff.
    ///
    /// Returns the decoded JSON body, the number of attempts used and the
    /// latency of the successful attempt.
    async fn send_with_retry(
        &self,
        backend: &str,
        timeout_ms: u64,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<(Value, u32, u64), LlmError> {
        let max_attempts = self.retry.max_attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.retry.backoff(attempt - 1);
                debug!(
                    "Retrying {backend} call (attempt {attempt}/{max_attempts}) after {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = build().timeout(Duration::from_millis(timeout_ms)).send().await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(resp) if resp.status().is_success() => {
                    let json: Value = resp
                        .json()
                        .await
                        .map_err(|e| LlmError::ParseError(e.to_string()))?;
                    return Ok((json, attempt, latency_ms));
                }
                Ok(resp) if RetryPolicy::is_retryable(resp.status()) => {
                    last_error = format!("HTTP {}", resp.status());
                    warn!("{backend} returned transient error: {last_error}");
                }
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let body: String =
                        resp.text().await.unwrap_or_default().chars().take(512).collect();
                    warn!("{backend} returned HTTP {status}");
                    return Err(LlmError::Http { status, body });
                }
                Err(e) if e.is_timeout() => {
                    last_error = format!("timed out after {timeout_ms}ms");
                    warn!("{backend} request timed out after {timeout_ms}ms");
                }
                Err(e) => {
                    warn!("{backend} request failed: {e}");
                    return Err(e.into());
                }
            }
        }

        Err(LlmError::RetriesExhausted { attempts: max_attempts, last_error })
    }
}
