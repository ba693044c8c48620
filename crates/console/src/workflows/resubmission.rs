//! The pending lecturer's self-service page: resubmitting the profile and
//! managing degrees and certifications while the account is under review.

use eduhub_client::FilePart;
use eduhub_core::business_errors::Recovery;
use eduhub_core::error::CoreError;
use eduhub_core::messages;
use eduhub_core::models::PendingLecturer;
use eduhub_core::requests::{CreateCertification, CreateDegree};
use eduhub_core::resubmission::{EditBuffer, LeaveGuard};
use eduhub_core::toast::Toast;
use eduhub_core::types::DbId;
use validator::Validate;

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppState;
use crate::workflows::refetch_lecturer_profile;

pub struct ResubmissionWorkflow {
    state: AppState,
    buffer: EditBuffer,
}

impl ResubmissionWorkflow {
    /// Fetch the profile and seed the edit buffer from it.
    pub async fn load(state: AppState) -> ConsoleResult<Self> {
        let profile = refetch_lecturer_profile(&state)
            .await
            .map_err(|e| state.report(e))?;
        Ok(Self {
            buffer: EditBuffer::seed(&profile),
            state,
        })
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.buffer
    }

    pub fn leave_guard(&self) -> LeaveGuard {
        self.buffer.leave_guard()
    }

    /// Follow the store's latest snapshot unless the user has unsaved edits.
    pub fn sync_from_store(&mut self) -> bool {
        match &self.state.store.snapshot().lecturer_profile {
            Some(profile) => self.buffer.reseed(profile),
            None => false,
        }
    }

    fn profile(&self) -> ConsoleResult<PendingLecturer> {
        self.state
            .store
            .snapshot()
            .lecturer_profile
            .clone()
            .ok_or(ConsoleError::NotAllowed(messages::NOT_FOUND))
    }

    /// Send the whole profile back for review. Requires a prior
    /// [`EditBuffer::request_save`]; otherwise nothing is sent.
    ///
    /// An unchanged draft is still sent: the resubmission itself moves the
    /// profile back to PENDING.
    pub async fn confirm_save(&mut self) -> ConsoleResult<()> {
        if !self.buffer.is_confirming() {
            return Err(self
                .state
                .report(ConsoleError::NotAllowed(messages::CONFIRM_REQUIRED)));
        }
        let payload = self.buffer.payload().map_err(|e| self.state.report(e))?;
        self.buffer.cancel_save();

        if let Err(e) = self.state.client.resubmit_lecturer(&payload).await {
            let error = self.state.report(e);
            if error.recovery() == Recovery::Reload {
                self.reload_discarding_edits().await;
            }
            return Err(error);
        }

        tracing::info!(lecturer_id = payload.id, "Lecturer profile resubmitted");
        self.state.toast(Toast::success(messages::RESUBMIT_SUCCESS));
        self.reload_discarding_edits().await;
        Ok(())
    }

    async fn reload_discarding_edits(&mut self) {
        match refetch_lecturer_profile(&self.state).await {
            Ok(profile) => self.buffer = EditBuffer::seed(&profile),
            Err(e) => {
                self.state.report(e);
            }
        }
    }

    async fn refresh_quietly(&mut self) {
        if let Err(e) = refetch_lecturer_profile(&self.state).await {
            self.state.report(e);
            return;
        }
        self.sync_from_store();
    }

    // -----------------------------------------------------------------------
    // Degrees and certifications
    // -----------------------------------------------------------------------

    pub async fn add_degree(&mut self, degree: CreateDegree) -> ConsoleResult<()> {
        degree
            .validate()
            .map_err(|e| self.state.report(CoreError::from(e)))?;
        self.state
            .client
            .create_degree(&degree)
            .await
            .map_err(|e| self.state.report(e))?;
        self.state.toast(Toast::success(messages::CREATE_SUCCESS));
        self.refresh_quietly().await;
        Ok(())
    }

    pub async fn add_certification(
        &mut self,
        certification: CreateCertification,
    ) -> ConsoleResult<()> {
        certification
            .validate()
            .map_err(|e| self.state.report(CoreError::from(e)))?;
        self.state
            .client
            .create_certification(&certification)
            .await
            .map_err(|e| self.state.report(e))?;
        self.state.toast(Toast::success(messages::CREATE_SUCCESS));
        self.refresh_quietly().await;
        Ok(())
    }

    /// Delete a degree. Only PENDING degrees may be deleted; anything else
    /// is refused without a request.
    pub async fn delete_degree(&mut self, id: DbId) -> ConsoleResult<()> {
        let profile = self.profile().map_err(|e| self.state.report(e))?;
        let deletable = profile
            .degrees
            .iter()
            .find(|d| d.id == id)
            .is_some_and(|d| d.is_deletable());
        if !deletable {
            return Err(self
                .state
                .report(ConsoleError::NotAllowed(messages::DELETE_NOT_ALLOWED)));
        }
        self.state
            .client
            .delete_degree(id)
            .await
            .map_err(|e| self.state.report(e))?;
        self.state.toast(Toast::success(messages::DELETE_SUCCESS));
        self.refresh_quietly().await;
        Ok(())
    }

    pub async fn delete_certification(&mut self, id: DbId) -> ConsoleResult<()> {
        let profile = self.profile().map_err(|e| self.state.report(e))?;
        let deletable = profile
            .certifications
            .iter()
            .find(|c| c.id == id)
            .is_some_and(|c| c.is_deletable());
        if !deletable {
            return Err(self
                .state
                .report(ConsoleError::NotAllowed(messages::DELETE_NOT_ALLOWED)));
        }
        self.state
            .client
            .delete_certification(id)
            .await
            .map_err(|e| self.state.report(e))?;
        self.state.toast(Toast::success(messages::DELETE_SUCCESS));
        self.refresh_quietly().await;
        Ok(())
    }

    /// Upload an attachment and return its URL for use in a form.
    pub async fn upload(&self, file: FilePart) -> ConsoleResult<String> {
        let url = self
            .state
            .client
            .upload(file)
            .await
            .map_err(|e| self.state.report(e))?;
        self.state.toast(Toast::success(messages::UPLOAD_SUCCESS));
        Ok(url)
    }
}
