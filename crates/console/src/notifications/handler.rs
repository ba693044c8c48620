//! Reacts to realtime envelopes by refetching the affected self profile.

use eduhub_core::messages;
use eduhub_core::toast::Toast;
use eduhub_events::realtime::{MessageType, ProfileTarget};
use eduhub_events::{ConsoleEvent, Published, RealtimeEnvelope};
use tokio::sync::broadcast;

use crate::error::ConsoleResult;
use crate::state::AppState;
use crate::store::Action;
use crate::workflows::refetch_lecturer_profile;

/// Consumes [`ConsoleEvent::Realtime`] events from the bus.
///
/// A known message replaces one profile object wholesale: the partner
/// profile, the institution profile, or the lecturer aggregate (degree and
/// certification decisions included). Unknown message types are logged and
/// ignored.
pub struct RealtimeHandler {
    state: AppState,
}

impl RealtimeHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Run until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<Published>) {
        loop {
            match receiver.recv().await {
                Ok(Published {
                    event: ConsoleEvent::Realtime { envelope },
                    ..
                }) => {
                    if let Err(e) = self.handle(&envelope).await {
                        tracing::debug!(
                            message_type = %envelope.kind,
                            "Failed to handle realtime message",
                        );
                        self.state.report(e);
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Realtime handler lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, realtime handler shutting down");
                    break;
                }
            }
        }
    }

    /// Handle one envelope. Returns the profile that was refetched, if any.
    pub async fn handle(
        &self,
        envelope: &RealtimeEnvelope,
    ) -> ConsoleResult<Option<ProfileTarget>> {
        let subject = match envelope.message_type() {
            MessageType::Known { subject, .. } => subject,
            MessageType::Unknown(kind) => {
                tracing::warn!(message_type = %kind, "Ignoring unknown realtime message");
                return Ok(None);
            }
        };

        tracing::info!(
            message_type = %envelope.kind,
            content = %envelope.content_text(),
            "Realtime notification",
        );

        let target = subject.profile();
        match target {
            ProfileTarget::Partner => {
                let profile = self.state.client.partner_profile().await?;
                self.state.dispatch(Action::SetPartnerProfile(profile));
            }
            ProfileTarget::Institution => {
                let profile = self.state.client.institution_profile().await?;
                self.state.dispatch(Action::SetInstitutionProfile(profile));
            }
            ProfileTarget::Lecturer => {
                refetch_lecturer_profile(&self.state).await?;
            }
        }

        self.state.toast(Toast::info(messages::PROFILE_UPDATED));
        Ok(Some(target))
    }
}
