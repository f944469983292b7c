use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Canned behaviour of the in-process Ollama stand-in.
#[derive(Clone)]
pub struct FakeOllama {
    pub status: StatusCode,
    pub completion: String,
    pub delay: Option<Duration>,
    /// Every JSON body received on a POST endpoint, in order.
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl FakeOllama {
    pub fn answering(completion: &str) -> Self {
        Self {
            status: StatusCode::OK,
            completion: completion.to_string(),
            delay: None,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::answering("")
        }
    }

    pub fn slow(completion: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::answering(completion)
        }
    }

    pub fn last_body(&self) -> Value {
        self.received
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request received")
    }
}

async fn respond(fake: &FakeOllama, ok: Value) -> Response {
    if let Some(delay) = fake.delay {
        tokio::time::sleep(delay).await;
    }
    if fake.status.is_success() {
        Json(ok).into_response()
    } else {
        (fake.status, "model runner crashed").into_response()
    }
}

async fn generate(State(fake): State<FakeOllama>, Json(body): Json<Value>) -> Response {
    fake.received.lock().unwrap().push(body.clone());
    let reply = json!({
        "model": body["model"],
        "response": fake.completion,
        "done": true,
        "eval_count": 21,
    });
    respond(&fake, reply).await
}

async fn chat(State(fake): State<FakeOllama>, Json(body): Json<Value>) -> Response {
    fake.received.lock().unwrap().push(body.clone());
    let reply = json!({
        "model": body["model"],
        "message": {"role": "assistant", "content": fake.completion},
        "done": true,
        "prompt_eval_count": 9,
        "eval_count": 4,
    });
    respond(&fake, reply).await
}

async fn tags(State(fake): State<FakeOllama>) -> Response {
    let reply = json!({
        "models": [
            {"name": "deepseek-r1:8b", "size": 4920000000u64},
            {"name": "llama3:8b"},
        ]
    });
    respond(&fake, reply).await
}

/// Serve `fake` on an ephemeral local port and return its base URL.
pub async fn spawn(fake: FakeOllama) -> String {
    let app = Router::new()
        .route("/api/generate", post(generate))
        .route("/api/chat", post(chat))
        .route("/api/tags", get(tags))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
