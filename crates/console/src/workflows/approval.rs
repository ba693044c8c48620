//! One approval workflow for every reviewable entity kind.
//!
//! An [`ApprovalWorkflow`] is configured with the entity kind, whether it
//! resolves create or update requests, the collections to refetch after a
//! successful resolution, and whether an approval notifies the submitter by
//! email. The dialog state machine itself lives in
//! [`eduhub_core::approval`].

use std::marker::PhantomData;

use eduhub_client::Collection;
use eduhub_core::approval::{ApprovalDialog, ResolveAction, ResolveCommand};
use eduhub_core::business_errors::Recovery;
use eduhub_core::messages;
use eduhub_core::review::Reviewable;
use eduhub_core::status::{EntityKind, RequestKind};
use eduhub_core::toast::Toast;
use eduhub_core::types::DbId;
use eduhub_events::EmailMessage;
use uuid::Uuid;

use crate::error::ConsoleResult;
use crate::state::AppState;
use crate::store::StoredReview;
use crate::workflows::refetch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalConfig {
    pub kind: EntityKind,
    pub request: RequestKind,
    /// Collections refetched, in order, after a successful resolution.
    pub refetch: Vec<Collection>,
    /// Email the submitter after an approval.
    pub notify_on_approve: bool,
}

impl ApprovalConfig {
    pub fn for_kind(kind: EntityKind, request: RequestKind) -> Self {
        let pending = match request {
            RequestKind::Create => Collection::PendingCreate,
            RequestKind::Update => Collection::PendingUpdate,
        };
        let refetch = match kind {
            // A lecturer screen shows both pending lists next to the canonical one.
            EntityKind::Lecturer => vec![
                Collection::PendingCreate,
                Collection::PendingUpdate,
                Collection::Canonical,
            ],
            _ => vec![pending, Collection::Canonical],
        };
        Self {
            kind,
            request,
            refetch,
            notify_on_approve: kind == EntityKind::Partner && request == RequestKind::Create,
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub id: DbId,
    pub action: ResolveAction,
    /// Set when a notification email was queued.
    pub email_task: Option<Uuid>,
}

pub struct ApprovalWorkflow<T> {
    state: AppState,
    config: ApprovalConfig,
    _entity: PhantomData<fn() -> T>,
}

impl<T: StoredReview> ApprovalWorkflow<T> {
    pub fn new(state: AppState, request: RequestKind) -> Self {
        Self::with_config(state, ApprovalConfig::for_kind(T::KIND, request))
    }

    pub fn with_config(state: AppState, config: ApprovalConfig) -> Self {
        Self {
            state,
            config,
            _entity: PhantomData,
        }
    }

    pub fn config(&self) -> &ApprovalConfig {
        &self.config
    }

    /// Open the dialog for one pending item.
    pub fn open(&self, id: DbId) -> ApprovalDialog {
        ApprovalDialog::open(id, self.config.request)
    }

    /// Submit the dialog's current decision.
    ///
    /// Validation failures are reported without any network call. On a
    /// backend failure the dialog returns to its confirmation step.
    pub async fn resolve(&self, dialog: &mut ApprovalDialog) -> ConsoleResult<Resolved> {
        let command = dialog.begin_submit().map_err(|e| self.state.report(e))?;

        // Captured before the refetch removes the item from the pending list.
        let recipient = self.notification_target(&command);

        if let Err(e) = self
            .state
            .client
            .resolve(self.config.kind, self.config.request, &command)
            .await
        {
            dialog.failed();
            let error = self.state.report(e);
            if error.recovery() == Recovery::Reload {
                self.refetch_all().await;
            }
            return Err(error);
        }

        dialog.succeeded();
        self.refetch_all().await;

        let action = command.action();
        let email_task = recipient.map(|message| self.state.outbox.enqueue_email(message));

        self.state.toast(Toast::success(match action {
            ResolveAction::Approve => messages::APPROVE_SUCCESS,
            ResolveAction::Reject => messages::REJECT_SUCCESS,
        }));

        Ok(Resolved {
            id: command.id(),
            action,
            email_task,
        })
    }

    /// Open, decide and submit in one step.
    pub async fn resolve_id(
        &self,
        id: DbId,
        action: ResolveAction,
        reason: Option<&str>,
    ) -> ConsoleResult<Resolved> {
        let mut dialog = self.open(id);
        dialog.select(action);
        if let Some(reason) = reason {
            dialog.set_reason(reason);
        }
        self.resolve(&mut dialog).await
    }

    /// Refetch every configured collection in order. A failed refetch does
    /// not undo the resolution; it is reported and the rest still run.
    async fn refetch_all(&self) {
        for collection in &self.config.refetch {
            if let Err(e) = refetch::<T>(&self.state, *collection).await {
                tracing::debug!(
                    kind = %self.config.kind,
                    collection = %collection,
                    "Refetch after resolution failed",
                );
                self.state.report(e);
            }
        }
    }

    fn notification_target(&self, command: &ResolveCommand) -> Option<EmailMessage> {
        if !self.config.notify_on_approve || command.action() != ResolveAction::Approve {
            return None;
        }
        let snapshot = self.state.store.snapshot();
        let entity = T::slice(&snapshot)
            .pending_creates
            .iter()
            .find(|e| e.id() == command.id())?;
        let to = entity.contact_email()?;
        Some(approval_email(to, entity.display_name()))
    }
}

/// The notification sent to a partner whose registration was approved.
pub fn approval_email(to: &str, organization: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "[EduHub] Hồ sơ đối tác đã được phê duyệt".to_string(),
        body: format!(
            "Xin chào {organization},\n\n\
             Hồ sơ đăng ký đối tác của bạn trên EduHub đã được phê duyệt.\n\
             Bạn có thể đăng nhập để bắt đầu sử dụng hệ thống.\n\n\
             Trân trọng,\nĐội ngũ EduHub"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_create_refetches_pending_then_canonical_and_notifies() {
        let config = ApprovalConfig::for_kind(EntityKind::Partner, RequestKind::Create);
        assert_eq!(
            config.refetch,
            vec![Collection::PendingCreate, Collection::Canonical]
        );
        assert!(config.notify_on_approve);
    }

    #[test]
    fn partner_update_does_not_notify() {
        let config = ApprovalConfig::for_kind(EntityKind::Partner, RequestKind::Update);
        assert_eq!(
            config.refetch,
            vec![Collection::PendingUpdate, Collection::Canonical]
        );
        assert!(!config.notify_on_approve);
    }

    #[test]
    fn lecturer_refetches_three_collections() {
        for request in [RequestKind::Create, RequestKind::Update] {
            let config = ApprovalConfig::for_kind(EntityKind::Lecturer, request);
            assert_eq!(config.refetch.len(), 3);
            assert!(!config.notify_on_approve);
        }
    }

    #[test]
    fn approval_email_names_organization() {
        let email = approval_email("contact@abc.vn", "ABC Corp");
        assert_eq!(email.to, "contact@abc.vn");
        assert!(email.body.contains("ABC Corp"));
    }
}
