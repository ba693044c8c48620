//! Event plumbing for the EduHub console.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`Outbox`]: queued side effects with retry (approval emails).
//! - [`RealtimeListener`]: websocket listener for backend notifications.
//! - [`delivery`]: SMTP email.

pub mod bus;
pub mod delivery;
pub mod outbox;
pub mod realtime;
pub mod reconnect;

pub use bus::{ConsoleEvent, EventBus, Published};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, EmailMessage, LogMailer, Mailer};
pub use outbox::{Outbox, OutboxConfig, OutboxWorker};
pub use realtime::{AccessTokenSource, RealtimeEnvelope, RealtimeListener, StaticToken};
