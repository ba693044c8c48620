use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use eduhub_client::{ApiClient, ClientConfig, MemoryTokenStore};
use eduhub_core::models::TokenPair;
use eduhub_events::EventBus;
use serde_json::{json, Value};

pub const VALID_ACCESS: &str = "access-new";
pub const VALID_REFRESH: &str = "refresh-good";

/// Call counters and switches shared with the mock handlers.
#[derive(Default)]
pub struct MockState {
    pub me_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    /// Reject every access token, even freshly refreshed ones.
    pub always_unauthorized: AtomicBool,
    /// Make the logout endpoint fail.
    pub logout_fails: AtomicBool,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Unauthorized", "code": "UNAUTHORIZED"})),
    )
        .into_response()
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    if state.always_unauthorized.load(Ordering::SeqCst) {
        return false;
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {VALID_ACCESS}")[..])
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(json!({
        "data": {"id": 1, "username": "admin", "email": "admin@eduhub.vn", "role": "ADMIN"}
    }))
    .into_response()
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if body["refreshToken"] != VALID_REFRESH {
        return unauthorized();
    }
    Json(json!({"data": {"accessToken": VALID_ACCESS, "refreshToken": "refresh-rotated"}}))
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == "admin" && body["password"] == "secret" {
        Json(json!({"data": {"accessToken": VALID_ACCESS, "refreshToken": VALID_REFRESH}}))
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Sai tên đăng nhập hoặc mật khẩu", "code": "BAD_CREDENTIALS"})),
        )
            .into_response()
    }
}

async fn logout(State(state): State<Arc<MockState>>) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.logout_fails.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn approve_partner(headers: HeaderMap, State(state): State<Arc<MockState>>) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    (
        StatusCode::CONFLICT,
        Json(json!({
            "error": "Business registration number already exists",
            "code": "DUPLICATE_REGISTRATION_NUMBER"
        })),
    )
        .into_response()
}

async fn upload(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("unnamed").to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            let url = format!("https://files.eduhub.vn/{name}?size={}", bytes.len());
            return Json(json!({ "data": url })).into_response();
        }
    }
    (StatusCode::BAD_REQUEST, Json(json!({"error": "missing file"}))).into_response()
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/v1/user/me", get(me))
        .route("/api/v1/user/upload", post(upload))
        .route("/api/v1/auth/refresh-token", post(refresh))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/admin/partners/approve", post(approve_partner))
        .with_state(state)
}

/// Start the mock backend on an ephemeral port and return its base URL.
pub async fn spawn(state: Arc<MockState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub struct Harness {
    pub client: ApiClient,
    pub tokens: Arc<MemoryTokenStore>,
    pub bus: EventBus,
    pub state: Arc<MockState>,
}

/// A client against a fresh mock backend with the given stored tokens.
pub async fn harness(tokens: Option<(&str, &str)>) -> Harness {
    let state = Arc::new(MockState::default());
    let base_url = spawn(state.clone()).await;

    let store = Arc::new(match tokens {
        Some((access, refresh)) => MemoryTokenStore::with_tokens(TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        }),
        None => MemoryTokenStore::new(),
    });
    let bus = EventBus::default();
    let client = ApiClient::new(ClientConfig::new(base_url), store.clone(), bus.clone()).unwrap();

    Harness {
        client,
        tokens: store,
        bus,
        state,
    }
}
