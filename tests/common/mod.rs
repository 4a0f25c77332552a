//! In-process mock of the WeCom endpoints used by the integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use chrono::{DateTime, Duration as TimeDelta, Utc};
use wemessage::{Clock, WeComClient, WeComConfig};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Canned reply: HTTP status plus raw body.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn into_response(self) -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], String) {
        (
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(CONTENT_TYPE, "application/json")],
            self.body,
        )
    }
}

/// A recorded request: query parameters, content type, body.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub query: HashMap<String, String>,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Default)]
pub struct MockState {
    pub token_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    /// Replies for successive token calls; falls back to `T` / 7200s when empty.
    pub token_script: Mutex<VecDeque<Reply>>,
    pub token_delay: Mutex<Duration>,
    pub upload_reply: Mutex<Option<Reply>>,
    pub send_reply: Mutex<Option<Reply>>,
    pub token_requests: Mutex<Vec<HashMap<String, String>>>,
    pub uploads: Mutex<Vec<Recorded>>,
    pub sends: Mutex<Vec<Recorded>>,
}

impl MockState {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn push_token(&self, reply: Reply) {
        self.token_script.lock().unwrap().push_back(reply);
    }

    pub fn set_token_delay(&self, delay: Duration) {
        *self.token_delay.lock().unwrap() = delay;
    }

    pub fn set_upload_reply(&self, reply: Reply) {
        *self.upload_reply.lock().unwrap() = Some(reply);
    }

    pub fn set_send_reply(&self, reply: Reply) {
        *self.send_reply.lock().unwrap() = Some(reply);
    }

    pub fn last_send(&self) -> Recorded {
        self.sends.lock().unwrap().last().cloned().unwrap()
    }

    pub fn last_upload(&self) -> Recorded {
        self.uploads.lock().unwrap().last().cloned().unwrap()
    }
}

pub fn token_ok(token: &str, expires_in: i64) -> Reply {
    Reply::json(json!({
        "errcode": 0,
        "errmsg": "ok",
        "access_token": token,
        "expires_in": expires_in,
    }))
}

pub fn app_error(code: i64, message: &str) -> Reply {
    Reply::json(json!({"errcode": code, "errmsg": message}))
}

async fn gettoken(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> impl axum::response::IntoResponse {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    state.token_requests.lock().unwrap().push(query);

    let delay = *state.token_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let reply = state
        .token_script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| token_ok("T", 7200));
    reply.into_response()
}

fn record(query: HashMap<String, String>, headers: &HeaderMap, body: Bytes) -> Recorded {
    Recorded {
        query,
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        body: body.to_vec(),
    }
}

async fn upload(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl axum::response::IntoResponse {
    state.upload_calls.fetch_add(1, Ordering::SeqCst);
    let kind = query.get("type").cloned().unwrap_or_default();
    state.uploads.lock().unwrap().push(record(query, &headers, body));

    let reply = state.upload_reply.lock().unwrap().clone();
    reply
        .unwrap_or_else(|| {
            Reply::json(json!({
                "errcode": 0,
                "errmsg": "ok",
                "type": kind,
                "media_id": "MEDIA-1",
                "created_at": "1380000000",
            }))
        })
        .into_response()
}

async fn send(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl axum::response::IntoResponse {
    state.send_calls.fetch_add(1, Ordering::SeqCst);
    state.sends.lock().unwrap().push(record(query, &headers, body));

    let reply = state.send_reply.lock().unwrap().clone();
    reply
        .unwrap_or_else(|| Reply::json(json!({"errcode": 0, "errmsg": "ok", "msgid": "M1"})))
        .into_response()
}

pub struct MockWeCom {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockWeCom {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/cgi-bin/gettoken", get(gettoken))
            .route("/cgi-bin/media/upload", post(upload))
            .route("/cgi-bin/message/send", post(send))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> WeComConfig {
        WeComConfig::new("mockCorpID", "mockCorpSecret")
            .with_base_url(self.base_url.clone())
            .with_agent_id(1)
    }

    pub fn client(&self) -> WeComClient {
        WeComClient::new(self.config()).unwrap()
    }
}
