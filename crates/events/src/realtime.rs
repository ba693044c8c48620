//! Realtime notification channel.
//!
//! The backend pushes `{ "type": ..., "content": ... }` envelopes over a
//! websocket whenever an admin resolves something the current user owns.
//! [`RealtimeListener`] keeps the socket open, reconnecting with backoff, and
//! republishes every envelope on the [`EventBus`]. Interpreting the envelope
//! (which profile to refetch) is up to the subscriber; [`MessageType`] does
//! the parsing.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::bus::{ConsoleEvent, EventBus};
use crate::reconnect::Backoff;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wire format of one realtime message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl RealtimeEnvelope {
    pub fn message_type(&self) -> MessageType {
        self.kind.parse().unwrap_or_else(|_| MessageType::Unknown(self.kind.clone()))
    }

    /// Human-readable content for logs.
    pub fn content_text(&self) -> String {
        match &self.content {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// What a realtime message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Partner,
    PartnerUpdate,
    Institution,
    InstitutionUpdate,
    Lecturer,
    LecturerUpdate,
    Degree,
    Certification,
}

/// The self profile a message invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTarget {
    Partner,
    Institution,
    /// The lecturer aggregate, credentials included.
    Lecturer,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "PARTNER",
            Self::PartnerUpdate => "PARTNER_UPDATE",
            Self::Institution => "INSTITUTION",
            Self::InstitutionUpdate => "INSTITUTION_UPDATE",
            Self::Lecturer => "LECTURER",
            Self::LecturerUpdate => "LECTURER_UPDATE",
            Self::Degree => "DEGREE",
            Self::Certification => "CERTIFICATION",
        }
    }

    pub fn profile(&self) -> ProfileTarget {
        match self {
            Self::Partner | Self::PartnerUpdate => ProfileTarget::Partner,
            Self::Institution | Self::InstitutionUpdate => ProfileTarget::Institution,
            Self::Lecturer | Self::LecturerUpdate | Self::Degree | Self::Certification => {
                ProfileTarget::Lecturer
            }
        }
    }

    const ALL: [Subject; 8] = [
        Self::Partner,
        Self::PartnerUpdate,
        Self::Institution,
        Self::InstitutionUpdate,
        Self::Lecturer,
        Self::LecturerUpdate,
        Self::Degree,
        Self::Certification,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Known { decision: Decision, subject: Subject },
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown realtime message type: {0}")]
pub struct UnknownMessageType(pub String);

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (decision, rest) = if let Some(rest) = s.strip_prefix("APPROVE_") {
            (Decision::Approve, rest)
        } else if let Some(rest) = s.strip_prefix("REJECT_") {
            (Decision::Reject, rest)
        } else {
            return Err(UnknownMessageType(s.to_string()));
        };

        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == rest)
            .map(|subject| MessageType::Known { decision, subject })
            .ok_or_else(|| UnknownMessageType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

enum Disconnect {
    Cancelled,
    Dropped,
}

/// Bearer token for the websocket handshake, asked for on every connect.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Option<String>;
}

/// A token that never changes.
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Background task that forwards realtime envelopes onto the bus.
pub struct RealtimeListener {
    url: String,
    tokens: Option<Arc<dyn AccessTokenSource>>,
    backoff: Backoff,
}

impl RealtimeListener {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tokens: None,
            backoff: Backoff::default(),
        }
    }

    /// Authenticate every handshake with the same bearer token.
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        self.with_token_source(Arc::new(StaticToken(token.into())))
    }

    /// Authenticate each handshake with whatever `source` holds at that
    /// moment, so reconnects pick up refreshed tokens.
    pub fn with_token_source(mut self, source: Arc<dyn AccessTokenSource>) -> Self {
        self.tokens = Some(source);
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn connect(&self) -> Result<WsStream, RealtimeError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| RealtimeError::Connection(e.to_string()))?;

        let token = match &self.tokens {
            Some(source) => source.access_token().await,
            None => None,
        };
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| RealtimeError::Protocol(e.to_string()))?;
            request.headers_mut().insert("authorization", value);
        }

        let (stream, _response) = connect_async(request).await.map_err(|e| {
            RealtimeError::Connection(format!("Failed to connect to {}: {e}", self.url))
        })?;

        tracing::info!(url = %self.url, "Realtime channel connected");
        Ok(stream)
    }

    /// Run until `cancel` fires. Connection failures never end the task.
    pub async fn run(mut self, bus: EventBus, cancel: CancellationToken) {
        loop {
            let connected = tokio::select! {
                _ = cancel.cancelled() => return,
                result = self.connect() => result,
            };

            match connected {
                Ok(stream) => {
                    self.backoff.reset();
                    if let Disconnect::Cancelled = Self::pump(stream, &bus, &cancel).await {
                        tracing::info!("Realtime listener stopped");
                        return;
                    }
                    tracing::warn!("Realtime channel dropped, reconnecting");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Realtime connect failed");
                }
            }

            let delay = self.backoff.next_wait();
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting before reconnect");
            if !Self::wait(delay, &cancel).await {
                return;
            }
        }
    }

    async fn wait(delay: Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    async fn pump(mut stream: WsStream, bus: &EventBus, cancel: &CancellationToken) -> Disconnect {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = stream.close(None).await;
                    return Disconnect::Cancelled;
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => Self::forward(&text, bus),
                    Some(Ok(Message::Close(_))) | None => return Disconnect::Dropped,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Realtime read error");
                        return Disconnect::Dropped;
                    }
                },
            }
        }
    }

    fn forward(text: &str, bus: &EventBus) {
        match serde_json::from_str::<RealtimeEnvelope>(text) {
            Ok(envelope) => {
                tracing::debug!(kind = %envelope.kind, "Realtime message received");
                bus.publish(ConsoleEvent::Realtime { envelope });
            }
            Err(e) => tracing::warn!(error = %e, "Malformed realtime message ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_parse() {
        let t: MessageType = "APPROVE_PARTNER_UPDATE".parse().unwrap();
        assert_eq!(
            t,
            MessageType::Known {
                decision: Decision::Approve,
                subject: Subject::PartnerUpdate
            }
        );

        let t: MessageType = "REJECT_DEGREE".parse().unwrap();
        assert_eq!(
            t,
            MessageType::Known {
                decision: Decision::Reject,
                subject: Subject::Degree
            }
        );
    }

    #[test]
    fn every_subject_parses_with_both_decisions() {
        for subject in Subject::ALL {
            for prefix in ["APPROVE_", "REJECT_"] {
                let raw = format!("{prefix}{}", subject.as_str());
                assert!(raw.parse::<MessageType>().is_ok(), "{raw}");
            }
        }
    }

    #[test]
    fn unknown_types_are_preserved() {
        let envelope = RealtimeEnvelope {
            kind: "APPROVE_COURSE".into(),
            content: serde_json::Value::Null,
        };
        assert_eq!(
            envelope.message_type(),
            MessageType::Unknown("APPROVE_COURSE".into())
        );
        assert!("PING".parse::<MessageType>().is_err());
    }

    #[test]
    fn credential_messages_target_lecturer_aggregate() {
        assert_eq!(Subject::Degree.profile(), ProfileTarget::Lecturer);
        assert_eq!(Subject::Certification.profile(), ProfileTarget::Lecturer);
        assert_eq!(Subject::LecturerUpdate.profile(), ProfileTarget::Lecturer);
        assert_eq!(Subject::InstitutionUpdate.profile(), ProfileTarget::Institution);
        assert_eq!(Subject::Partner.profile(), ProfileTarget::Partner);
    }

    #[test]
    fn envelope_deserializes_type_key() {
        let envelope: RealtimeEnvelope = serde_json::from_str(
            r#"{"type":"REJECT_LECTURER","content":"Hồ sơ bị từ chối"}"#,
        )
        .unwrap();
        assert_eq!(envelope.kind, "REJECT_LECTURER");
        assert_eq!(envelope.content_text(), "Hồ sơ bị từ chối");
    }
}
