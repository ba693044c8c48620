//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] carries everything the console surfaces outside the workflow
//! that produced it: toasts, navigation requests, realtime envelopes and
//! outbound task outcomes. Cloning the bus is cheap; all clones publish into
//! the same channel.

use chrono::{DateTime, Utc};
use eduhub_core::toast::Toast;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::realtime::RealtimeEnvelope;

// ---------------------------------------------------------------------------
// ConsoleEvent
// ---------------------------------------------------------------------------

/// Something the console shell should react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsoleEvent {
    /// Show a notification.
    Toast { toast: Toast },

    /// Move to another route, e.g. the login screen after the session ends.
    Navigate { route: String },

    /// A message received on the realtime channel.
    Realtime { envelope: RealtimeEnvelope },

    /// An outbound task completed.
    OutboxDelivered { task_id: Uuid, description: String },

    /// An outbound task exhausted its retries.
    OutboxFailed {
        task_id: Uuid,
        description: String,
        attempts: u32,
        error: String,
    },
}

impl ConsoleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toast { .. } => "toast",
            Self::Navigate { .. } => "navigate",
            Self::Realtime { .. } => "realtime",
            Self::OutboxDelivered { .. } => "outbox_delivered",
            Self::OutboxFailed { .. } => "outbox_failed",
        }
    }
}

/// A published event with its publication time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Published {
    pub event: ConsoleEvent,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use eduhub_core::toast::Toast;
/// use eduhub_events::bus::EventBus;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.toast(Toast::success("Duyệt thành công"));
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Published>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer overflows.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped silently when
    /// nobody is listening.
    pub fn publish(&self, event: ConsoleEvent) {
        tracing::debug!(kind = event.as_str(), "Publishing console event");
        let _ = self.sender.send(Published {
            event,
            timestamp: Utc::now(),
        });
    }

    pub fn toast(&self, toast: Toast) {
        self.publish(ConsoleEvent::Toast { toast });
    }

    pub fn navigate(&self, route: impl Into<String>) {
        self.publish(ConsoleEvent::Navigate {
            route: route.into(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Published> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
