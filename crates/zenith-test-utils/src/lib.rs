//! Shared test utilities for zenith integration tests.
//!
//! - [`ScriptedModel`]: an in-memory [`GenerativeModel`] that replays queued
//!   replies and counts calls.
//! - [`spawn_fake_gemini`]: a local HTTP server that answers like the
//!   Generative Language API, for exercising the real `GeminiClient`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::IntoResponse;
use serde_json::Value;
use tokio::task::JoinHandle;

use zenith_core::model::{GenerativeModel, ModelError};

// ---------------------------------------------------------------------------
// Scripted model
// ---------------------------------------------------------------------------

/// A [`GenerativeModel`] that answers from a queue.
///
/// Each `submit` pops the next scripted outcome; once the queue is empty it
/// returns [`ModelError::EmptyResponse`]. Every call is counted, including
/// calls made while unavailable.
pub struct ScriptedModel {
    available: bool,
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn build(available: bool, replies: Vec<Result<String, ModelError>>) -> Self {
        Self {
            available,
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A model with no credential configured.
    pub fn unavailable() -> Self {
        Self::build(false, Vec::new())
    }

    /// An available model that answers once with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::build(true, vec![Ok(text.into())])
    }

    /// An available model whose single call fails with `err`.
    pub fn failing(err: ModelError) -> Self {
        Self::build(true, vec![Err(err)])
    }

    /// An available model with an explicit script.
    pub fn with_script(replies: Vec<Result<String, ModelError>>) -> Self {
        Self::build(true, replies)
    }

    /// Number of `submit` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Wrap in an `Arc` for handing to handlers while keeping a handle for
    /// assertions.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn submit(&self, prompt: &str) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if !self.available {
            return Err(ModelError::MissingCredential);
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ModelError::EmptyResponse))
    }
}

// ---------------------------------------------------------------------------
// Fake Gemini server
// ---------------------------------------------------------------------------

/// One request received by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

struct FakeState {
    status: StatusCode,
    body: String,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Handle to a running fake server. The server stops when this is dropped.
pub struct FakeGemini {
    pub base_url: String,
    state: Arc<FakeState>,
    handle: JoinHandle<()>,
}

impl FakeGemini {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeGemini {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Body of a successful `generateContent` response carrying `text`.
pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }
        ]
    })
    .to_string()
}

async fn record(
    State(state): State<Arc<FakeState>>,
    method: axum::http::Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        api_key,
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// Start a server on an ephemeral local port that answers every request
/// with `status` and `body`.
pub async fn spawn_fake_gemini(status: StatusCode, body: impl Into<String>) -> FakeGemini {
    let state = Arc::new(FakeState {
        status,
        body: body.into(),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new().fallback(record).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake Gemini listener");
    let addr = listener
        .local_addr()
        .expect("fake Gemini listener has no local address");

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    FakeGemini {
        base_url: format!("http://{addr}"),
        state,
        handle,
    }
}
