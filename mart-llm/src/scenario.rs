//! Scenario generation with graceful degradation.
//!
//! ```text
//! prompt ──▶ client (retries 503/429) ──▶ parse + validate ──▶ Scenario
//!                     │                          │
//!              retries exhausted            bad / empty JSON
//!                     └──────────▶ fallback_scenario ◀┘
//! ```
//!
//! Errors that the player can fix (missing or rejected key, no provider)
//! are returned instead of papered over, so the front end can prompt for
//! key setup.

use mart_core::fallback::fallback_scenario;
use mart_core::types::{Category, Difficulty, Scenario};
use tracing::{info, warn};

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::prompt;
use crate::types::LlmRequest;

/// Where a scenario came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioSource {
    /// Parsed from the API response.
    Generated,
    /// Substituted placeholder.
    Fallback,
}

/// Produces scenarios for a difficulty and category.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    client: LlmClient,
    timeout_ms: u64,
}

impl ScenarioGenerator {
    /// Wrap a client. `timeout_ms` bounds each HTTP attempt.
    #[must_use]
    pub fn new(client: LlmClient, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &LlmClient {
        &self.client
    }

    /// Generate a scenario, substituting the placeholder when the content
    /// is unusable or the API stays overloaded.
    ///
    /// # Errors
    /// Missing key, unavailable provider, or a non-transient API error.
    pub async fn generate(
        &self,
        difficulty: Difficulty,
        category: Category,
    ) -> Result<Scenario, LlmError> {
        self.generate_with_source(difficulty, category).await.map(|(s, _)| s)
    }

    /// Like [`generate`](Self::generate) but also reports the source.
    ///
    /// # Errors
    /// See [`generate`](Self::generate).
    pub async fn generate_with_source(
        &self,
        difficulty: Difficulty,
        category: Category,
    ) -> Result<(Scenario, ScenarioSource), LlmError> {
        let request = LlmRequest::structured(
            prompt::scenario_prompt(difficulty, category),
            prompt::scenario_schema(),
        )
        .with_timeout(self.timeout_ms);

        let response = match self.client.generate(&request).await {
            Ok(response) => response,
            Err(LlmError::RetriesExhausted { attempts, last_error }) => {
                warn!(attempts, %last_error, "scenario API kept failing, using fallback");
                return Ok((fallback_scenario(difficulty, category), ScenarioSource::Fallback));
            }
            Err(e) => return Err(e),
        };

        match parse_scenario(&response.text) {
            Ok(scenario) => {
                info!(
                    theme = %scenario.theme,
                    attempts = response.attempts,
                    latency_ms = response.latency_ms,
                    "scenario generated"
                );
                Ok((scenario, ScenarioSource::Generated))
            }
            Err(e) => {
                warn!("Failed to parse scenario response: {e}");
                Ok((fallback_scenario(difficulty, category), ScenarioSource::Fallback))
            }
        }
    }

    /// Send a short prompt and report whether any text came back.
    pub async fn test_connection(&self) -> bool {
        let request = LlmRequest::text(prompt::CONNECTION_TEST_PROMPT).with_timeout(self.timeout_ms);
        match self.client.generate(&request).await {
            Ok(response) => !response.text.trim().is_empty(),
            Err(e) => {
                warn!("API connection test failed: {e}");
                false
            }
        }
    }
}

/// Parse and validate a scenario from raw response text.
///
/// Surrounding whitespace and a Markdown code fence are tolerated.
///
/// # Errors
/// Empty text, malformed JSON, or a scenario that fails validation.
pub fn parse_scenario(text: &str) -> Result<Scenario, LlmError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(LlmError::ParseError("empty response".into()));
    }
    let scenario: Scenario = serde_json::from_str(body)
        .map_err(|e| LlmError::ParseError(format!("JSON parse error: {e}")))?;
    scenario
        .validate()
        .map_err(|e| LlmError::ParseError(e.to_string()))?;
    Ok(scenario)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"{
        "theme": "싱싱 과일가게",
        "items": [
            {"id": "1", "name": "사과", "description": "빨강", "icon": "🍎"},
            {"id": "2", "name": "바나나", "description": "노랑", "icon": "🍌"}
        ],
        "decoys": [
            {"id": "d1", "name": "토마토", "description": "채소", "icon": "🍅"}
        ]
    }"#;

    #[test]
    fn parses_plain_json() {
        let s = parse_scenario(GOOD).expect("valid");
        assert_eq!(s.theme, "싱싱 과일가게");
        assert_eq!(s.items.len(), 2);
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{GOOD}\n```");
        assert!(parse_scenario(&fenced).is_ok());
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(parse_scenario("   "), Err(LlmError::ParseError(_))));
        assert!(matches!(parse_scenario("죄송합니다"), Err(LlmError::ParseError(_))));
        assert!(matches!(parse_scenario(r#"{"theme":"x"}"#), Err(LlmError::ParseError(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dup = GOOD.replace("\"d1\"", "\"1\"");
        assert!(matches!(parse_scenario(&dup), Err(LlmError::ParseError(_))));
    }

    #[tokio::test]
    async fn unavailable_provider_is_an_error_not_a_fallback() {
        let generator = ScenarioGenerator::new(LlmClient::none(), 1000);
        let err = generator.generate(Difficulty::Easy, Category::Fruit).await.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable(_)));
        assert!(!generator.test_connection().await);
    }
}
