//! Edit buffer for the pending lecturer's self-service page.
//!
//! The buffer is seeded from the store's [`PendingLecturer`] snapshot and
//! follows later snapshots only while the user has not typed anything. Saving
//! always sends the whole lecturer object with `status` forced to PENDING,
//! even when nothing changed: a resubmission is itself the state transition.

use validator::Validate;

use crate::error::CoreError;
use crate::models::{Lecturer, PendingLecturer};
use crate::requests::ResubmitLecturer;
use crate::status::ApprovalStatus;

/// Whether leaving the page must be confirmed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveGuard {
    Free,
    ConfirmBeforeLeaving,
}

#[derive(Debug, Clone)]
pub struct EditBuffer {
    original: ResubmitLecturer,
    draft: ResubmitLecturer,
    confirming: bool,
}

impl EditBuffer {
    pub fn seed(snapshot: &PendingLecturer) -> Self {
        Self::from_lecturer(&snapshot.lecturer)
    }

    pub fn from_lecturer(lecturer: &Lecturer) -> Self {
        let original = ResubmitLecturer::from(lecturer);
        Self {
            draft: original.clone(),
            original,
            confirming: false,
        }
    }

    /// Apply a newer store snapshot. Returns `false` (and keeps the user's
    /// edits) when the buffer is dirty.
    pub fn reseed(&mut self, snapshot: &PendingLecturer) -> bool {
        if self.is_dirty() {
            return false;
        }
        *self = Self::seed(snapshot);
        true
    }

    pub fn draft(&self) -> &ResubmitLecturer {
        &self.draft
    }

    pub fn original(&self) -> &ResubmitLecturer {
        &self.original
    }

    /// Mutate the draft in place.
    pub fn edit(&mut self, f: impl FnOnce(&mut ResubmitLecturer)) {
        f(&mut self.draft);
        // Status and id are not user-editable.
        self.draft.id = self.original.id;
        self.draft.status = self.original.status;
    }

    /// True when any tracked field differs from the seeded snapshot.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    pub fn leave_guard(&self) -> LeaveGuard {
        if self.is_dirty() {
            LeaveGuard::ConfirmBeforeLeaving
        } else {
            LeaveGuard::Free
        }
    }

    /// "Save" pressed: open the confirmation step.
    pub fn request_save(&mut self) {
        self.confirming = true;
    }

    pub fn cancel_save(&mut self) {
        self.confirming = false;
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    /// The validated replacement payload, status forced to PENDING.
    pub fn payload(&self) -> Result<ResubmitLecturer, CoreError> {
        let mut payload = self.draft.clone();
        payload.status = ApprovalStatus::Pending;
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: &str) -> PendingLecturer {
        serde_json::from_value(serde_json::json!({
            "lecturer": {
                "id": 42,
                "fullName": "Nguyễn Văn An",
                "citizenId": "001203004567",
                "email": "an@edu.example",
                "phoneNumber": "0912345678",
                "specialization": "Khoa học dữ liệu",
                "experienceYears": 5,
                "status": status,
                "adminNote": "Thiếu giấy tờ"
            },
            "degrees": [],
            "certifications": []
        }))
        .unwrap()
    }

    #[test]
    fn unchanged_save_submits_seed_with_pending_status() {
        let snap = snapshot("REJECTED");
        let buffer = EditBuffer::seed(&snap);

        assert!(!buffer.is_dirty());
        let payload = buffer.payload().unwrap();

        let mut expected = ResubmitLecturer::from(&snap.lecturer);
        expected.status = ApprovalStatus::Pending;
        assert_eq!(payload, expected);
    }

    #[test]
    fn any_field_change_arms_leave_guard() {
        let mut buffer = EditBuffer::seed(&snapshot("PENDING"));
        assert_eq!(buffer.leave_guard(), LeaveGuard::Free);

        buffer.edit(|d| d.bio = Some("Giảng viên 5 năm".into()));
        assert_eq!(buffer.leave_guard(), LeaveGuard::ConfirmBeforeLeaving);

        buffer.edit(|d| d.bio = None);
        assert_eq!(buffer.leave_guard(), LeaveGuard::Free);
    }

    #[test]
    fn status_is_not_editable() {
        let mut buffer = EditBuffer::seed(&snapshot("REJECTED"));
        buffer.edit(|d| d.status = ApprovalStatus::Approved);
        assert!(!buffer.is_dirty());
        assert_eq!(buffer.draft().status, ApprovalStatus::Rejected);
    }

    #[test]
    fn reseed_follows_store_while_clean() {
        let mut buffer = EditBuffer::seed(&snapshot("REJECTED"));
        assert!(buffer.reseed(&snapshot("PENDING")));
        assert_eq!(buffer.original().status, ApprovalStatus::Pending);
    }

    #[test]
    fn reseed_keeps_dirty_edits() {
        let mut buffer = EditBuffer::seed(&snapshot("REJECTED"));
        buffer.edit(|d| d.full_name = "Nguyễn Văn Bình".into());

        assert!(!buffer.reseed(&snapshot("PENDING")));
        assert_eq!(buffer.draft().full_name, "Nguyễn Văn Bình");
    }

    #[test]
    fn invalid_draft_is_refused() {
        let mut buffer = EditBuffer::seed(&snapshot("PENDING"));
        buffer.edit(|d| d.citizen_id = Some("123".into()));
        assert!(matches!(buffer.payload(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn save_needs_confirmation_step() {
        let mut buffer = EditBuffer::seed(&snapshot("PENDING"));
        assert!(!buffer.is_confirming());
        buffer.request_save();
        assert!(buffer.is_confirming());
        buffer.cancel_save();
        assert!(!buffer.is_confirming());
    }
}
