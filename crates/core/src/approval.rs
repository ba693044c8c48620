//! Approve/reject dialog state machine.
//!
//! Every reviewable entity kind shares this one dialog:
//!
//! ```text
//! Idle ──select(action)──▶ ConfirmPending(action) ──begin_submit──▶ Submitting(action)
//!  ▲                            ▲        │                                  │
//!  └──────────dismiss───────────┘        └──────────── failed ◀─────────────┤
//!  └─────────────────────────────── succeeded ◀─────────────────────────────┘
//! ```
//!
//! The dialog holds no network handles. The console's workflow layer calls
//! [`ApprovalDialog::begin_submit`], performs the request, then reports the
//! outcome with [`ApprovalDialog::succeeded`] or [`ApprovalDialog::failed`].

use serde::{Deserialize, Serialize};

use crate::messages;
use crate::requests::{ApproveRequest, RejectRequest};
use crate::status::RequestKind;
use crate::types::DbId;

/// The admin's decision on a pending item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveAction {
    Approve,
    Reject,
}

impl ResolveAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for ResolveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    ConfirmPending(ResolveAction),
    Submitting(ResolveAction),
}

/// A validated resolution ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveCommand {
    Approve(ApproveRequest),
    Reject(RejectRequest),
}

impl ResolveCommand {
    pub fn action(&self) -> ResolveAction {
        match self {
            Self::Approve(_) => ResolveAction::Approve,
            Self::Reject(_) => ResolveAction::Reject,
        }
    }

    pub fn id(&self) -> DbId {
        match self {
            Self::Approve(req) => req.id,
            Self::Reject(req) => req.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("{}", messages::SELECT_ACTION_REQUIRED)]
    NoActionSelected,

    #[error("{}", messages::REJECT_REASON_REQUIRED)]
    ReasonRequired,

    #[error("{}", messages::RESOLVE_IN_PROGRESS)]
    AlreadySubmitting,
}

/// Dialog for resolving one pending create or update request.
#[derive(Debug, Clone)]
pub struct ApprovalDialog {
    target: DbId,
    request: RequestKind,
    state: DialogState,
    reason: String,
}

impl ApprovalDialog {
    /// Open a dialog for a pending item. For update requests `target` is the
    /// update request id.
    pub fn open(target: DbId, request: RequestKind) -> Self {
        Self {
            target,
            request,
            state: DialogState::Idle,
            reason: String::new(),
        }
    }

    pub fn target(&self) -> DbId {
        self.target
    }

    pub fn request(&self) -> RequestKind {
        self.request
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Choose approve or reject. Ignored while a submission is in flight.
    pub fn select(&mut self, action: ResolveAction) {
        if !self.is_submitting() {
            self.state = DialogState::ConfirmPending(action);
        }
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, DialogState::Submitting(_))
    }

    /// The "submit button enabled" flag.
    ///
    /// Reject requires a non-empty trimmed reason; approve never does.
    pub fn can_submit(&self) -> bool {
        match self.state {
            DialogState::ConfirmPending(ResolveAction::Approve) => true,
            DialogState::ConfirmPending(ResolveAction::Reject) => !self.reason.trim().is_empty(),
            DialogState::Idle | DialogState::Submitting(_) => false,
        }
    }

    /// Validate and move to `Submitting`, returning the request to send.
    ///
    /// On error the state is left untouched.
    pub fn begin_submit(&mut self) -> Result<ResolveCommand, DialogError> {
        let action = match self.state {
            DialogState::Idle => return Err(DialogError::NoActionSelected),
            DialogState::Submitting(_) => return Err(DialogError::AlreadySubmitting),
            DialogState::ConfirmPending(action) => action,
        };

        let command = match action {
            ResolveAction::Approve => ResolveCommand::Approve(ApproveRequest { id: self.target }),
            ResolveAction::Reject => {
                let note = self.reason.trim();
                if note.is_empty() {
                    return Err(DialogError::ReasonRequired);
                }
                ResolveCommand::Reject(RejectRequest {
                    id: self.target,
                    admin_note: note.to_string(),
                })
            }
        };

        self.state = DialogState::Submitting(action);
        Ok(command)
    }

    /// The server accepted the resolution.
    pub fn succeeded(&mut self) {
        self.state = DialogState::Idle;
        self.reason.clear();
    }

    /// The request failed. The dialog stays open on the same action so the
    /// admin can retry or dismiss it.
    pub fn failed(&mut self) {
        if let DialogState::Submitting(action) = self.state {
            self.state = DialogState::ConfirmPending(action);
        }
    }

    /// Close the confirmation step without submitting.
    pub fn dismiss(&mut self) {
        if !self.is_submitting() {
            self.state = DialogState::Idle;
        }
    }
}
