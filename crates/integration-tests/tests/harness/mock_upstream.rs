//! Mock speech provider for integration tests
//!
//! Serves a chat-completions endpoint that answers with one configured
//! response shape and records every synthesis request it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio_util::sync::CancellationToken;

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const AUDIO_FILE_PATH: &str = "/files/speech.wav";
const MISSING_FILE_PATH: &str = "/files/missing.mp3";

/// Response shape the mock gives to synthesis calls
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw audio with the given content type
    Audio { content_type: &'static str, bytes: Vec<u8> },
    /// Completion envelope carrying a base64 data URI
    DataUri(Vec<u8>),
    /// Completion envelope pointing at an audio file served by the mock
    AudioUrl { content_type: &'static str, bytes: Vec<u8> },
    /// Completion envelope pointing at a file the mock answers 404 for
    MissingAudioUrl,
    /// Completion envelope pointing at an audio file served after a delay
    StalledAudioUrl(Duration),
    /// Completion envelope with arbitrary message content
    Completion(String),
    /// Body with a content type that is neither JSON nor audio
    Unlabeled(Vec<u8>),
    /// Error status with a provider error body
    Status(StatusCode),
    /// Temporary redirect to an audio file served by the mock
    Redirect,
    /// Audio, after a delay
    Slow(Duration),
}

/// A synthesis call as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl RecordedRequest {
    /// The synthesis instruction decoded from the message content
    pub fn instruction(&self) -> serde_json::Value {
        let content = self.body["messages"][0]["content"]
            .as_str()
            .expect("message content is a string");
        serde_json::from_str(content).expect("message content is JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct MockState {
    addr: SocketAddr,
    reply: MockReply,
    requests: Mutex<Vec<RecordedRequest>>,
    fetches: Mutex<u32>,
}

/// Mock provider that returns predictable responses
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockUpstream {
    /// Start the mock server, returning immediately
    pub async fn start(reply: MockReply) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockState {
            addr,
            reply,
            requests: Mutex::new(Vec::new()),
            fetches: Mutex::new(0),
        });

        let app = Router::new()
            .route(COMPLETIONS_PATH, routing::post(handle_completion))
            .route(AUDIO_FILE_PATH, routing::get(handle_audio_file))
            .route(MISSING_FILE_PATH, routing::get(handle_missing_file))
            .with_state(Arc::clone(&state));

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Completion endpoint URL for the proxy configuration
    pub fn completions_url(&self) -> String {
        format!("http://{}{COMPLETIONS_PATH}", self.addr)
    }

    /// Synthesis calls received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The single synthesis call received
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one synthesis call");
        requests.into_iter().next().unwrap()
    }

    /// Number of audio file downloads served
    pub fn fetch_count(&self) -> u32 {
        *self.state.fetches.lock().unwrap()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn completion(content: &str) -> Response {
    Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

async fn handle_completion(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest { headers, body });

    match &state.reply {
        MockReply::Audio { content_type, bytes } => {
            ([(header::CONTENT_TYPE, *content_type)], bytes.clone()).into_response()
        }
        MockReply::DataUri(bytes) => completion(&format!("data:audio/mpeg;base64,{}", STANDARD.encode(bytes))),
        MockReply::AudioUrl { .. } => completion(&format!("http://{}{AUDIO_FILE_PATH}", state.addr)),
        MockReply::StalledAudioUrl(_) => completion(&format!("http://{}{AUDIO_FILE_PATH}", state.addr)),
        MockReply::MissingAudioUrl => completion(&format!("http://{}{MISSING_FILE_PATH}", state.addr)),
        MockReply::Completion(content) => completion(content),
        MockReply::Unlabeled(bytes) => ([(header::CONTENT_TYPE, "text/plain")], bytes.clone()).into_response(),
        MockReply::Status(status) => (
            *status,
            Json(serde_json::json!({
                "error": { "message": "mock provider failure", "type": "server_error" }
            })),
        )
            .into_response(),
        MockReply::Redirect => (
            StatusCode::TEMPORARY_REDIRECT,
            [(header::LOCATION, format!("http://{}{AUDIO_FILE_PATH}", state.addr))],
        )
            .into_response(),
        MockReply::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            ([(header::CONTENT_TYPE, "audio/mpeg")], vec![0xFF, 0xFB]).into_response()
        }
    }
}

async fn handle_audio_file(State(state): State<Arc<MockState>>) -> Response {
    *state.fetches.lock().unwrap() += 1;

    match &state.reply {
        MockReply::AudioUrl { content_type, bytes } => {
            ([(header::CONTENT_TYPE, *content_type)], bytes.clone()).into_response()
        }
        MockReply::StalledAudioUrl(delay) => {
            tokio::time::sleep(*delay).await;
            ([(header::CONTENT_TYPE, "audio/mpeg")], vec![0xFF, 0xFB]).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn handle_missing_file(State(state): State<Arc<MockState>>) -> StatusCode {
    *state.fetches.lock().unwrap() += 1;
    StatusCode::NOT_FOUND
}
