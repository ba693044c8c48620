use std::sync::Arc;

use eduhub_client::{ApiClient, ApiError};
use eduhub_core::toast::Toast;
use eduhub_events::{EventBus, Outbox};

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::store::{Action, Store};

/// Shared handles every workflow needs.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConsoleConfig>,
    pub client: ApiClient,
    pub store: Store,
    pub bus: EventBus,
    /// Queue for side effects that must not block admin actions.
    pub outbox: Outbox,
}

impl AppState {
    pub fn new(config: ConsoleConfig, client: ApiClient, bus: EventBus, outbox: Outbox) -> Self {
        Self {
            config: Arc::new(config),
            client,
            store: Store::default(),
            bus,
            outbox,
        }
    }

    pub fn dispatch(&self, action: Action) {
        self.store.dispatch(action);
    }

    pub fn toast(&self, toast: Toast) {
        self.bus.toast(toast);
    }

    /// Show the error's message and hand the error back for propagation.
    pub fn report(&self, error: impl Into<ConsoleError>) -> ConsoleError {
        let error = error.into();
        error.log();
        // The client has already announced an expired session.
        if !matches!(error, ConsoleError::Api(ApiError::SessionExpired)) {
            self.bus.toast(error.toast());
        }
        error
    }
}
