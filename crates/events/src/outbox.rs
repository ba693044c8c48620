//! Outbound task queue.
//!
//! Side effects that must never hold up or fail an admin action (the partner
//! approval email) are enqueued here. [`Outbox::enqueue`] returns
//! immediately; an [`OutboxWorker`] drains the queue in the background,
//! retries each task with fixed delays, and reports the final outcome as a
//! [`ConsoleEvent`] on the bus.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::bus::{ConsoleEvent, EventBus};
use crate::delivery::email::{EmailMessage, Mailer};

/// Delays between attempts (1 s, 2 s, 4 s): four attempts in total.
const DEFAULT_RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

#[derive(Debug, Clone)]
pub struct OutboxConfig {
    pub retry_delays: Vec<Duration>,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            retry_delays: DEFAULT_RETRY_DELAYS_SECS
                .iter()
                .map(|s| Duration::from_secs(*s))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Email(EmailMessage),
}

#[derive(Debug, Clone)]
pub struct OutboundTask {
    pub id: Uuid,
    pub kind: TaskKind,
}

impl OutboundTask {
    pub fn description(&self) -> String {
        match &self.kind {
            TaskKind::Email(message) => format!("email to {}: {}", message.to, message.subject),
        }
    }
}

/// Producer handle. Cheap to clone.
#[derive(Clone)]
pub struct Outbox {
    sender: mpsc::UnboundedSender<OutboundTask>,
}

impl Outbox {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        bus: EventBus,
        config: OutboxConfig,
    ) -> (Self, OutboxWorker) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = OutboxWorker {
            receiver,
            mailer,
            bus,
            config,
        };
        (Self { sender }, worker)
    }

    /// Queue an email. Never blocks and never fails the caller; if the
    /// worker is gone the task is logged and dropped.
    pub fn enqueue_email(&self, message: EmailMessage) -> Uuid {
        let task = OutboundTask {
            id: Uuid::new_v4(),
            kind: TaskKind::Email(message),
        };
        let id = task.id;
        tracing::debug!(task_id = %id, description = %task.description(), "Task queued");
        if self.sender.send(task).is_err() {
            tracing::warn!(task_id = %id, "Outbox worker stopped, task dropped");
        }
        id
    }
}

pub struct OutboxWorker {
    receiver: mpsc::UnboundedReceiver<OutboundTask>,
    mailer: Arc<dyn Mailer>,
    bus: EventBus,
    config: OutboxConfig,
}

impl OutboxWorker {
    /// Process tasks until cancelled or every [`Outbox`] handle is dropped.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!("Outbox worker started");
        loop {
            let task = tokio::select! {
                _ = cancel.cancelled() => break,
                task = self.receiver.recv() => match task {
                    Some(task) => task,
                    None => break,
                },
            };
            self.process(task).await;
        }
        tracing::info!("Outbox worker stopped");
    }

    async fn process(&self, task: OutboundTask) {
        let description = task.description();
        let mut attempts = 0u32;
        let mut delays = self.config.retry_delays.iter();

        loop {
            attempts += 1;
            let result = match &task.kind {
                TaskKind::Email(message) => self.mailer.send(message).await,
            };

            match result {
                Ok(()) => {
                    tracing::info!(task_id = %task.id, attempts, "Outbound task delivered");
                    self.bus.publish(ConsoleEvent::OutboxDelivered {
                        task_id: task.id,
                        description,
                    });
                    return;
                }
                Err(e) => match delays.next() {
                    Some(delay) => {
                        tracing::warn!(
                            task_id = %task.id,
                            attempt = attempts,
                            error = %e,
                            "Outbound task failed, retrying",
                        );
                        tokio::time::sleep(*delay).await;
                    }
                    None => {
                        tracing::error!(
                            task_id = %task.id,
                            attempts,
                            error = %e,
                            "Outbound task failed permanently",
                        );
                        self.bus.publish(ConsoleEvent::OutboxFailed {
                            task_id: task.id,
                            description,
                            attempts,
                            error: e.to_string(),
                        });
                        return;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::delivery::email::EmailError;

    /// Fails the first `failures` sends, then succeeds.
    struct FlakyMailer {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Mailer for FlakyMailer {
        async fn send(&self, _message: &EmailMessage) -> Result<(), EmailError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(EmailError::Message("smtp down".into()))
            } else {
                Ok(())
            }
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "partner@abc.vn".into(),
            subject: "Hồ sơ đã được duyệt".into(),
            body: "Xin chào".into(),
        }
    }

    fn setup(failures: u32) -> (Outbox, OutboxWorker, Arc<FlakyMailer>, EventBus) {
        let mailer = Arc::new(FlakyMailer {
            failures,
            calls: AtomicU32::new(0),
        });
        let bus = EventBus::default();
        let (outbox, worker) = Outbox::new(mailer.clone(), bus.clone(), OutboxConfig::default());
        (outbox, worker, mailer, bus)
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried() {
        let (outbox, worker, mailer, bus) = setup(2);
        let mut rx = bus.subscribe();

        let id = outbox.enqueue_email(message());
        drop(outbox);
        worker.run(CancellationToken::new()).await;

        assert_eq!(mailer.calls.load(Ordering::SeqCst), 3);
        let event = rx.recv().await.unwrap().event;
        assert_matches!(event, ConsoleEvent::OutboxDelivered { task_id, .. } if task_id == id);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_reported_after_all_attempts() {
        let (outbox, worker, mailer, bus) = setup(u32::MAX);
        let mut rx = bus.subscribe();

        outbox.enqueue_email(message());
        drop(outbox);
        worker.run(CancellationToken::new()).await;

        assert_eq!(mailer.calls.load(Ordering::SeqCst), 4);
        let event = rx.recv().await.unwrap().event;
        assert_matches!(
            event,
            ConsoleEvent::OutboxFailed { attempts: 4, ref error, .. } if error.contains("smtp down")
        );
    }

    #[tokio::test]
    async fn enqueue_never_fails_without_worker() {
        let (outbox, worker, _mailer, _bus) = setup(0);
        drop(worker);
        let _ = outbox.enqueue_email(message());
    }

    #[tokio::test]
    async fn cancellation_stops_worker() {
        let (_outbox, worker, _mailer, _bus) = setup(0);
        let cancel = CancellationToken::new();
        cancel.cancel();
        worker.run(cancel).await;
    }
}
