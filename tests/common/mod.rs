//! Fake chat backend for integration tests
//!
//! An axum server on an ephemeral local port speaking the same REST API as
//! the real backend, with switches for the failure modes tests need.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use roomchat::api::dto::{MessageListResponse, RoomListResponse};
use roomchat::config::ApiConfig;
use roomchat::{Config, Message, Room, SessionEvents};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct BackendState {
    users: Mutex<HashMap<String, String>>,
    tokens: Mutex<HashMap<String, String>>,
    rooms: Mutex<Vec<Room>>,
    messages: Mutex<HashMap<String, Vec<Message>>>,
    reject_all: AtomicBool,
    malformed_rooms: AtomicBool,
    rejection_delay_ms: AtomicU64,
    unauthorized_responses: AtomicUsize,
}

impl BackendState {
    /// Answer 401 to every authenticated request from now on
    pub fn reject_all(&self) {
        self.reject_all.store(true, Ordering::SeqCst);
    }

    /// Serve a room list with missing fields
    pub fn serve_malformed_rooms(&self) {
        self.malformed_rooms.store(true, Ordering::SeqCst);
    }

    /// Hold room-list 401s this long before answering
    pub fn delay_rejections(&self, delay: Duration) {
        self.rejection_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn unauthorized_responses(&self) -> usize {
        self.unauthorized_responses.load(Ordering::SeqCst)
    }

    pub fn add_user(&self, username: &str, password: &str) {
        self.users
            .lock()
            .unwrap()
            .insert(username.to_string(), password.to_string());
    }

    fn issue_token(&self, username: &str) -> String {
        let mut tokens = self.tokens.lock().unwrap();
        let token = format!("token-{}-{}", username, tokens.len() + 1);
        tokens.insert(token.clone(), username.to_string());
        token
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        let username = if self.reject_all.load(Ordering::SeqCst) {
            None
        } else {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .and_then(|token| self.tokens.lock().unwrap().get(token).cloned())
        };

        username.ok_or_else(|| {
            self.unauthorized_responses.fetch_add(1, Ordering::SeqCst);
            StatusCode::UNAUTHORIZED
        })
    }
}

type Shared = Arc<BackendState>;

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct CreateRoom {
    name: String,
}

#[derive(Deserialize)]
struct PostMessage {
    content: String,
}

async fn login(State(state): State<Shared>, Json(creds): Json<Credentials>) -> Response {
    let known = state.users.lock().unwrap().get(&creds.username).cloned();
    if known.as_deref() != Some(creds.password.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let token = state.issue_token(&creds.username);
    Json(json!({ "username": creds.username, "token": token })).into_response()
}

async fn create_account(State(state): State<Shared>, Json(creds): Json<Credentials>) -> Response {
    {
        let mut users = state.users.lock().unwrap();
        if users.contains_key(&creds.username) {
            return StatusCode::CONFLICT.into_response();
        }
        users.insert(creds.username.clone(), creds.password);
    }
    let token = state.issue_token(&creds.username);
    Json(json!({ "username": creds.username, "token": token })).into_response()
}

async fn list_rooms(State(state): State<Shared>, headers: HeaderMap) -> Result<Response, StatusCode> {
    if let Err(status) = state.authorize(&headers) {
        let delay = state.rejection_delay_ms.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        return Err(status);
    }
    if state.malformed_rooms.load(Ordering::SeqCst) {
        return Ok(Json(json!({ "rooms": [{ "id": "r1" }] })).into_response());
    }
    let rooms = state.rooms.lock().unwrap().clone();
    Ok(Json(RoomListResponse { rooms }).into_response())
}

async fn create_room(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CreateRoom>,
) -> Result<StatusCode, StatusCode> {
    state.authorize(&headers)?;
    let mut rooms = state.rooms.lock().unwrap();
    let id = format!("room-{}", rooms.len() + 1);
    rooms.push(Room { id, name: body.name });
    Ok(StatusCode::CREATED)
}

async fn list_messages(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Response, StatusCode> {
    state.authorize(&headers)?;
    if !state.rooms.lock().unwrap().iter().any(|r| r.id == room_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let messages = state
        .messages
        .lock()
        .unwrap()
        .get(&room_id)
        .cloned()
        .unwrap_or_default();
    Ok(Json(MessageListResponse { messages }).into_response())
}

async fn post_message(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Json(body): Json<PostMessage>,
) -> Result<StatusCode, StatusCode> {
    let author = state.authorize(&headers)?;
    if !state.rooms.lock().unwrap().iter().any(|r| r.id == room_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut messages = state.messages.lock().unwrap();
    let list = messages.entry(room_id).or_default();
    let id = format!("m{}", list.len() + 1);
    list.push(Message {
        id,
        content: body.content,
        author,
        created_at: chrono::Utc::now().to_rfc3339(),
    });
    Ok(StatusCode::CREATED)
}

pub struct FakeServer {
    pub url: String,
    pub state: Shared,
    handle: JoinHandle<()>,
}

impl FakeServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(BackendState::default());
        let router = Router::new()
            .route("/login", post(login))
            .route("/accounts", post(create_account))
            .route("/rooms", get(list_rooms).post(create_room))
            .route(
                "/rooms/:room_id/messages",
                get(list_messages).post(post_message),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.url.clone(),
            request_timeout_secs: 5,
        }
    }

    /// Client config pointed at this server, polling every `poll_ms`
    pub fn config(&self, poll_ms: u64) -> Config {
        let mut config = Config::default();
        config.api = self.api_config();
        config.sync.poll_interval_ms = poll_ms;
        config
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Records teardown hook calls
#[derive(Default)]
pub struct RecordingEvents {
    notices: Mutex<Vec<String>>,
    reloads: AtomicUsize,
}

impl RecordingEvents {
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl SessionEvents for RecordingEvents {
    fn notify_expired(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn request_reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// Poll `check` until it holds or five seconds pass
pub async fn eventually<F: FnMut() -> bool>(mut check: F) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
