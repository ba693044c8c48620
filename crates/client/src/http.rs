//! The single HTTP boundary of the console.
//!
//! Every authenticated request carries `Authorization: Bearer <access>`. On a
//! 401 the client makes exactly one refresh call and retries the original
//! request exactly once. If the refresh token is missing, the refresh call
//! fails, or the retry is still unauthorized, both tokens are cleared, a
//! navigation to the login route and a session-expired toast are published,
//! and the call returns [`ApiError::SessionExpired`]. Concurrent 401s each
//! perform their own refresh.

use std::sync::Arc;
use std::time::Duration;

use eduhub_core::messages;
use eduhub_core::models::TokenPair;
use eduhub_core::requests::RefreshRequest;
use eduhub_core::toast::Toast;
use eduhub_events::EventBus;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::tokens::TokenStore;

pub const REFRESH_PATH: &str = "/api/v1/auth/refresh-token";

const REQUEST_ID_HEADER: &str = "x-request-id";

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Success envelope: `{ "data": T }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Failure envelope: `{ "error": message, "code": CODE }`. Older endpoints
/// send `message` instead of `error`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    /// Absent when the server does not rotate refresh tokens.
    refresh_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

/// A file sent as the multipart field `file`.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    File(FilePart),
}

/// A request that can be rebuilt for the retry after a refresh.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Body,
    /// Attach the bearer token and take part in the refresh flow.
    pub authenticated: bool,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Body::Empty,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.body = Body::File(part);
        self
    }

    /// No bearer token and no refresh on 401 (login, logout, refresh).
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:8080`.
    pub base_url: String,
    pub timeout: Duration,
    /// Route published on the bus when the session ends.
    pub login_route: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            login_route: "/login".to_string(),
        }
    }
}

/// Typed REST client. Endpoint methods live in [`crate::endpoints`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    tokens: Arc<dyn TokenStore>,
    bus: EventBus,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
        bus: EventBus,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
            tokens,
            bus,
        })
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send `spec` once with the given bearer token.
    async fn send_once(
        &self,
        spec: &RequestSpec,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut builder = self
            .http
            .request(spec.method.clone(), self.url(&spec.path))
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }

        builder = match &spec.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::File(part) => {
                let mut file = reqwest::multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.file_name.clone());
                if let Some(mime) = &part.mime {
                    file = file.mime_str(mime)?;
                }
                builder.multipart(reqwest::multipart::Form::new().part("file", file))
            }
        };

        tracing::debug!(method = %spec.method, path = %spec.path, %request_id, "Sending request");
        let response = builder.send().await?;
        tracing::debug!(
            method = %spec.method,
            path = %spec.path,
            %request_id,
            status = response.status().as_u16(),
            "Received response",
        );
        Ok(response)
    }

    /// Execute `spec`, running the refresh-once flow on a 401.
    ///
    /// Returns the final response whatever its status, except that a 401 on
    /// an authenticated request always ends in [`ApiError::SessionExpired`].
    pub async fn execute(&self, spec: &RequestSpec) -> Result<reqwest::Response, ApiError> {
        if !spec.authenticated {
            return self.send_once(spec, None).await;
        }

        let access = self.tokens.access_token().await?;
        let response = self.send_once(spec, access.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::info!(path = %spec.path, "Access token rejected, refreshing");

        let Some(refresh_token) = self.tokens.refresh_token().await? else {
            tracing::warn!("No refresh token stored");
            return Err(self.expire_session().await);
        };

        let pair = match self.refresh(&refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                return Err(self.expire_session().await);
            }
        };
        self.tokens.save(&pair).await?;

        let retried = self.send_once(spec, Some(&pair.access_token)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %spec.path, "Retry still unauthorized");
            return Err(self.expire_session().await);
        }
        Ok(retried)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let spec = RequestSpec::post(REFRESH_PATH)
            .anonymous()
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })?;
        let response = self.send_once(&spec, None).await?;
        let body: RefreshResponse = Self::parse_data(response).await?;

        Ok(TokenPair {
            access_token: body.access_token,
            refresh_token: body
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_string()),
        })
    }

    /// Clear tokens and send the user to the login screen.
    async fn expire_session(&self) -> ApiError {
        if let Err(e) = self.tokens.clear().await {
            tracing::error!(error = %e, "Failed to clear tokens");
        }
        self.bus.navigate(self.config.login_route.clone());
        self.bus.toast(Toast::error(messages::SESSION_EXPIRED));
        ApiError::SessionExpired
    }

    /// Execute and decode the `data` field of the success envelope.
    pub async fn fetch<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T, ApiError> {
        let response = self.execute(spec).await?;
        Self::parse_data(response).await
    }

    /// Execute and discard the success body.
    pub async fn send(&self, spec: &RequestSpec) -> Result<(), ApiError> {
        let response = self.execute(spec).await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Map a non-2xx response to [`ApiError::Api`], reading the error
    /// envelope when there is one.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .error
            .or(body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("Unknown error").to_string()
                } else {
                    text.clone()
                }
            });

        Err(ApiError::Api {
            status: status.as_u16(),
            code: body.code,
            message,
        })
    }

    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        let envelope: DataResponse<T> =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}
