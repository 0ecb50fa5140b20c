//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

use timeout_protection::protocol::{INITIAL_REQUEST_HEADER, POLL_HEADER};

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SeenRequest {
    pub method: Method,
    pub uri: String,
    pub initial_id: Option<String>,
    pub poll_id: Option<String>,
    pub tenant: Option<String>,
    pub body: Bytes,
}

/// How the mock backend answers.
#[derive(Debug, Clone)]
pub struct Script {
    /// Status of the tagged initial request.
    pub initial_status: u16,
    /// Body of the initial request when it is not 504.
    pub initial_body: &'static str,
    /// Polls answered with 204 before the final answer. `None` never finishes.
    pub not_ready_polls: Option<usize>,
    /// Final poll answer.
    pub final_status: u16,
    pub final_body: &'static str,
    /// Time each poll is held before answering.
    pub poll_hold: Duration,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            initial_status: 504,
            initial_body: "",
            not_ready_polls: Some(0),
            final_status: 200,
            final_body: "",
            poll_hold: Duration::ZERO,
        }
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    script: Script,
    seen: Mutex<Vec<SeenRequest>>,
    polls_answered: Mutex<usize>,
}

impl MockBackend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn polls(&self) -> Vec<SeenRequest> {
        self.requests().into_iter().filter(|r| r.poll_id.is_some()).collect()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

async fn handle(
    State(backend): State<Arc<MockBackend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let seen = SeenRequest {
        method,
        uri: uri.to_string(),
        initial_id: header(&headers, INITIAL_REQUEST_HEADER),
        poll_id: header(&headers, POLL_HEADER),
        tenant: header(&headers, "x-tenant"),
        body,
    };
    let is_poll = seen.poll_id.is_some();
    backend.seen.lock().unwrap().push(seen);

    let script = &backend.script;
    if !is_poll {
        let status = StatusCode::from_u16(script.initial_status).unwrap();
        return (status, script.initial_body).into_response();
    }

    if !script.poll_hold.is_zero() {
        tokio::time::sleep(script.poll_hold).await;
    }

    let answered = {
        let mut answered = backend.polls_answered.lock().unwrap();
        *answered += 1;
        *answered
    };
    let ready = matches!(script.not_ready_polls, Some(n) if answered > n);
    if ready {
        let status = StatusCode::from_u16(script.final_status).unwrap();
        (status, script.final_body).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Start a mock backend speaking the polling protocol on an ephemeral port.
pub async fn start_backend(script: Script) -> Arc<MockBackend> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let backend = Arc::new(MockBackend {
        addr: listener.local_addr().unwrap(),
        script,
        seen: Mutex::new(Vec::new()),
        polls_answered: Mutex::new(0),
    });

    let app = Router::new().fallback(handle).with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    backend
}
