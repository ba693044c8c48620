//! Stateful mock backend for console workflow tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use eduhub_client::{ApiClient, ClientConfig, MemoryTokenStore};
use eduhub_console::{AppState, ConsoleConfig};
use eduhub_core::models::TokenPair;
use eduhub_events::{
    ConsoleEvent, EmailError, EmailMessage, EventBus, Mailer, Outbox, OutboxConfig, Published,
};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Server-side collections and a log of every call.
#[derive(Default)]
pub struct Backend {
    /// `"METHOD /path"` in arrival order.
    pub calls: Mutex<Vec<String>>,
    /// JSON bodies of mutating calls, keyed by path.
    pub bodies: Mutex<Vec<(String, Value)>>,
    pub pending_creates: Mutex<HashMap<String, Vec<Value>>>,
    pub pending_updates: Mutex<HashMap<String, Vec<Value>>>,
    pub canonical: Mutex<HashMap<String, Vec<Value>>>,
    pub members: Mutex<HashMap<i64, Vec<Value>>>,
    pub lecturer_profile: Mutex<Value>,
    /// When set, approve/reject answers 409 with this `(code, message)`.
    pub resolve_error: Mutex<Option<(&'static str, &'static str)>>,
    /// When set, the profile resubmission answers 409 with this `(code, message)`.
    pub resubmit_error: Mutex<Option<(&'static str, &'static str)>>,
}

impl Backend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn bodies_for(&self, path: &str) -> Vec<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, b)| b.clone())
            .collect()
    }

    pub fn seed_pending(&self, resource: &str, items: Vec<Value>) {
        self.pending_creates
            .lock()
            .unwrap()
            .insert(resource.to_string(), items);
    }

    pub fn seed_canonical(&self, resource: &str, items: Vec<Value>) {
        self.canonical.lock().unwrap().insert(resource.to_string(), items);
    }

    fn record_body(&self, path: String, body: Value) {
        self.bodies.lock().unwrap().push((path, body));
    }

    fn list(map: &Mutex<HashMap<String, Vec<Value>>>, resource: &str) -> Vec<Value> {
        map.lock().unwrap().get(resource).cloned().unwrap_or_default()
    }
}

fn data(value: Value) -> Response {
    Json(json!({ "data": value })).into_response()
}

async fn log_calls(State(backend): State<Arc<Backend>>, req: Request, next: Next) -> Response {
    backend
        .calls
        .lock()
        .unwrap()
        .push(format!("{} {}", req.method(), req.uri().path()));
    next.run(req).await
}

// ---------------------------------------------------------------------------
// Review collections
// ---------------------------------------------------------------------------

async fn canonical(State(b): State<Arc<Backend>>, Path(resource): Path<String>) -> Response {
    data(Value::Array(Backend::list(&b.canonical, &resource)))
}

async fn pending_create(State(b): State<Arc<Backend>>, Path(resource): Path<String>) -> Response {
    data(Value::Array(Backend::list(&b.pending_creates, &resource)))
}

async fn pending_update(State(b): State<Arc<Backend>>, Path(resource): Path<String>) -> Response {
    data(Value::Array(Backend::list(&b.pending_updates, &resource)))
}

fn resolve_failure(b: &Backend) -> Option<Response> {
    conflict(*b.resolve_error.lock().unwrap())
}

fn conflict(failure: Option<(&'static str, &'static str)>) -> Option<Response> {
    failure.map(|(code, message)| {
        (
            StatusCode::CONFLICT,
            Json(json!({ "error": message, "code": code })),
        )
            .into_response()
    })
}

/// Move a pending create out of the queue, into the canonical list when
/// approved.
fn resolve_create(b: &Backend, resource: &str, id: i64, approved: bool) {
    let mut pending = b.pending_creates.lock().unwrap();
    let queue = pending.entry(resource.to_string()).or_default();
    let Some(pos) = queue.iter().position(|v| v["id"] == id) else {
        return;
    };
    let mut item = queue.remove(pos);
    if approved {
        item["status"] = json!("APPROVED");
        b.canonical
            .lock()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .push(item);
    }
}

async fn approve(
    State(b): State<Arc<Backend>>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record_body(format!("/api/v1/admin/{resource}/approve"), body.clone());
    if let Some(failure) = resolve_failure(&b) {
        return failure;
    }
    resolve_create(&b, &resource, body["id"].as_i64().unwrap_or_default(), true);
    data(Value::Null)
}

async fn reject(
    State(b): State<Arc<Backend>>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record_body(format!("/api/v1/admin/{resource}/reject"), body.clone());
    if let Some(failure) = resolve_failure(&b) {
        return failure;
    }
    resolve_create(&b, &resource, body["id"].as_i64().unwrap_or_default(), false);
    data(Value::Null)
}

// ---------------------------------------------------------------------------
// Course members
// ---------------------------------------------------------------------------

async fn members(State(b): State<Arc<Backend>>, Path(id): Path<i64>) -> Response {
    data(Value::Array(
        b.members.lock().unwrap().get(&id).cloned().unwrap_or_default(),
    ))
}

async fn replace_members(
    State(b): State<Arc<Backend>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    b.record_body(format!("/api/v1/admin/courses/{id}/lecturers"), body.clone());
    let mut all = b.members.lock().unwrap();
    let current = all.get(&id).cloned().unwrap_or_default();
    let lecturers = Backend::list(&b.canonical, "lecturers");
    let replaced = body
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let lecturer_id = entry["lecturerId"].clone();
            let lecturer = current
                .iter()
                .map(|m| m["lecturer"].clone())
                .chain(lecturers.iter().cloned())
                .find(|l| l["id"] == lecturer_id)
                .unwrap_or_else(|| json!({"id": lecturer_id, "fullName": "?"}));
            json!({"lecturer": lecturer, "courseRole": entry["courseRole"]})
        })
        .collect();
    all.insert(id, replaced);
    data(Value::Null)
}

// ---------------------------------------------------------------------------
// Lecturer self-service
// ---------------------------------------------------------------------------

async fn lecturer_profile(State(b): State<Arc<Backend>>) -> Response {
    data(b.lecturer_profile.lock().unwrap().clone())
}

async fn resubmit(State(b): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    b.record_body("/api/v1/lecturer/profile".to_string(), body.clone());
    if let Some(failure) = conflict(*b.resubmit_error.lock().unwrap()) {
        return failure;
    }
    b.lecturer_profile.lock().unwrap()["lecturer"] = body;
    data(Value::Null)
}

async fn delete_degree(State(b): State<Arc<Backend>>, Path(id): Path<i64>) -> Response {
    let mut profile = b.lecturer_profile.lock().unwrap();
    if let Some(degrees) = profile["degrees"].as_array_mut() {
        degrees.retain(|d| d["id"] != id);
    }
    data(Value::Null)
}

pub fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/api/v1/admin/{resource}", get(canonical))
        .route("/api/v1/admin/{resource}/pending-create", get(pending_create))
        .route("/api/v1/admin/{resource}/pending-update", get(pending_update))
        .route("/api/v1/admin/{resource}/approve", post(approve))
        .route("/api/v1/admin/{resource}/reject", post(reject))
        .route(
            "/api/v1/admin/courses/{id}/lecturers",
            get(members).put(replace_members),
        )
        .route("/api/v1/lecturer/profile", get(lecturer_profile).put(resubmit))
        .route("/api/v1/lecturer/degrees/{id}", delete(delete_degree))
        .layer(middleware::from_fn_with_state(backend.clone(), log_calls))
        .with_state(backend)
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Collects outbound email instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct Harness {
    pub app: AppState,
    pub backend: Arc<Backend>,
    pub events: broadcast::Receiver<Published>,
    pub mailer: Arc<RecordingMailer>,
    pub cancel: CancellationToken,
}

impl Harness {
    /// Everything published so far.
    pub fn published(&mut self) -> Vec<ConsoleEvent> {
        let mut events = Vec::new();
        while let Ok(p) = self.events.try_recv() {
            events.push(p.event);
        }
        events
    }

    pub fn toasts(&mut self) -> Vec<String> {
        self.published()
            .into_iter()
            .filter_map(|e| match e {
                ConsoleEvent::Toast { toast } => Some(toast.message),
                _ => None,
            })
            .collect()
    }

    /// Wait for the first event matching `pred`.
    pub async fn wait_for(&mut self, pred: impl Fn(&ConsoleEvent) -> bool) -> ConsoleEvent {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let published = self.events.recv().await.unwrap();
                if pred(&published.event) {
                    return published.event;
                }
            }
        })
        .await
        .expect("event not published in time")
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub async fn harness(backend: Backend) -> Harness {
    let backend = Arc::new(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base_url = format!("http://{addr}");
    let bus = EventBus::default();
    let events = bus.subscribe();
    let tokens = Arc::new(MemoryTokenStore::with_tokens(TokenPair {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
    }));
    let client = ApiClient::new(ClientConfig::new(base_url.clone()), tokens, bus.clone()).unwrap();

    let mailer = Arc::new(RecordingMailer::default());
    let (outbox, worker) = Outbox::new(mailer.clone(), bus.clone(), OutboxConfig::default());
    let cancel = CancellationToken::new();
    tokio::spawn(worker.run(cancel.clone()));

    let config = ConsoleConfig {
        api_base_url: base_url,
        ..ConsoleConfig::default()
    };
    Harness {
        app: AppState::new(config, client, bus, outbox),
        backend,
        events,
        mailer,
        cancel,
    }
}

pub fn partner(id: i64, name: &str, email: &str) -> Value {
    json!({"id": id, "organizationName": name, "email": email, "status": "PENDING"})
}

pub fn lecturer(id: i64, name: &str) -> Value {
    json!({"id": id, "fullName": name, "email": format!("gv{id}@eduhub.vn"), "status": "APPROVED"})
}
