use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use parking_lot::Mutex;
use serde_json::{Value, json};

use mart_llm::{LlmClient, LlmProvider, RetryPolicy};

/// One scripted answer from the mock API.
#[derive(Clone)]
pub enum Reply {
    /// Respond immediately with this status and JSON body.
    Json(StatusCode, Value),
    /// Sleep before answering 200 with an empty body.
    Slow(Duration),
}

/// A request the mock saw.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    seen: Arc<Mutex<Vec<Seen>>>,
    hits: Arc<AtomicUsize>,
}

pub struct MockApi {
    pub addr: SocketAddr,
    state: MockState,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl MockApi {
    /// Start a mock that plays `replies` in order, repeating the last one.
    pub async fn start(replies: Vec<Reply>) -> Self {
        let state = MockState {
            replies: Arc::new(Mutex::new(replies.into())),
            seen: Arc::new(Mutex::new(Vec::new())),
            hits: Arc::new(AtomicUsize::new(0)),
        };
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self { addr, state, _shutdown: server }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().clone()
    }

    /// Gemini client against this mock with millisecond backoff.
    pub fn gemini_client(&self) -> LlmClient {
        let provider = LlmProvider::Gemini { base_url: self.base_url(), api_key: "test-key".into() };
        LlmClient::new(provider, "gemini-test", fast_retry())
    }

    /// OpenAI-compatible client against this mock.
    pub fn openai_client(&self) -> LlmClient {
        let provider =
            LlmProvider::OpenAiCompatible { base_url: self.base_url(), api_key: "sk-test".into() };
        LlmClient::new(provider, "gpt-test", fast_retry())
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy { max_retries: 3, initial_backoff: Duration::from_millis(1) }
}

async fn handle(
    State(state): State<MockState>,
    headers: HeaderMap,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.seen.lock().push(Seen {
        path: uri.path().to_string(),
        headers,
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    let reply = {
        let mut replies = state.replies.lock();
        if replies.len() > 1 { replies.pop_front() } else { replies.front().cloned() }
    };
    match reply {
        Some(Reply::Json(status, value)) => (status, value.to_string()),
        Some(Reply::Slow(delay)) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, "{}".to_string())
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no reply scripted".to_string()),
    }
}

/// Gemini-shaped success wrapping `text`.
pub fn gemini_text(text: &str) -> Reply {
    Reply::Json(
        StatusCode::OK,
        json!({
            "candidates": [ { "content": { "role": "model", "parts": [ { "text": text } ] } } ]
        }),
    )
}

/// OpenAI-shaped success wrapping `text`.
pub fn openai_text(text: &str) -> Reply {
    Reply::Json(
        StatusCode::OK,
        json!({ "choices": [ { "message": { "role": "assistant", "content": text } } ] }),
    )
}

pub fn status(code: StatusCode) -> Reply {
    Reply::Json(code, json!({ "error": { "code": code.as_u16(), "message": "scripted" } }))
}

/// A valid five-item grocery scenario as the model would return it.
pub fn grocery_json() -> String {
    json!({
        "theme": "행복 동네 시장",
        "items": [
            { "id": "i1", "name": "배추", "description": "김장", "icon": "🥬" },
            { "id": "i2", "name": "무", "description": "시원", "icon": "🥕" },
            { "id": "i3", "name": "두부", "description": "고소", "icon": "🧈" },
            { "id": "i4", "name": "달걀", "description": "한판", "icon": "🥚" },
            { "id": "i5", "name": "고등어", "description": "생선", "icon": "🐟" }
        ],
        "decoys": [
            { "id": "d1", "name": "양배추", "description": "채소", "icon": "🥗" },
            { "id": "d2", "name": "당근", "description": "주황", "icon": "🥕" },
            { "id": "d3", "name": "순두부", "description": "부들", "icon": "🍲" },
            { "id": "d4", "name": "메추리알", "description": "작은", "icon": "🥚" },
            { "id": "d5", "name": "꽁치", "description": "생선", "icon": "🐠" }
        ]
    })
    .to_string()
}
