//! # mart-llm: Scenario Generation for Memory Mart
//!
//! Talks to a generative-AI endpoint that answers with JSON:
//!   - **Gemini** `generateContent` (default)
//!   - **OpenAI-compatible** chat completions
//!
//! Every call goes through this crate, ensuring:
//!   - Structured output (JSON mode + response schema)
//!   - Per-attempt timeouts
//!   - Retry on 503/429 with exponential backoff (1s, 2s, 4s)
//!   - A placeholder scenario when the answer cannot be used
//!
//! # Architecture
//!
//! ```text
//! Prefetcher ──▶ ScenarioGenerator ──▶ LlmClient ──▶ HTTP
//!   (lobby)        (parse/fallback)     (retry)
//! ```

pub mod client;
pub mod error;
pub mod prefetch;
pub mod prompt;
pub mod retry;
pub mod scenario;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use error::LlmError;
pub use prefetch::Prefetcher;
pub use retry::RetryPolicy;
pub use scenario::{ScenarioGenerator, ScenarioSource};
pub use types::{LlmRequest, LlmResponse};
