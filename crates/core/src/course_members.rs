//! Local editing model for the course member dialog.
//!
//! All edits mutate a local copy. Nothing is persisted until the dialog is
//! saved, at which point [`MemberEditor::payload`] produces the whole
//! replacement array. AUTHOR members are locked: they cannot be removed,
//! re-roled, or created from here.

use crate::messages;
use crate::models::{CourseMember, CourseRole, LecturerSummary};
use crate::requests::CourseMemberPayload;
use crate::types::DbId;

/// Maximum number of candidate lecturers shown by the search box.
pub const CANDIDATE_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemberError {
    #[error("{}", messages::AUTHOR_LOCKED)]
    AuthorLocked,

    #[error("{}", messages::MEMBER_ALREADY_EXISTS)]
    AlreadyMember(DbId),

    #[error("{}", messages::MEMBER_NOT_FOUND)]
    NotMember(DbId),
}

/// A rendered membership row with its control flags.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRow {
    pub lecturer: LecturerSummary,
    pub role: CourseRole,
    pub removable: bool,
    pub role_editable: bool,
}

#[derive(Debug, Clone)]
pub struct MemberEditor {
    course_id: DbId,
    original: Vec<CourseMember>,
    members: Vec<CourseMember>,
}

impl MemberEditor {
    pub fn new(course_id: DbId, members: Vec<CourseMember>) -> Self {
        Self {
            course_id,
            original: members.clone(),
            members,
        }
    }

    pub fn course_id(&self) -> DbId {
        self.course_id
    }

    pub fn members(&self) -> &[CourseMember] {
        &self.members
    }

    fn position(&self, lecturer_id: DbId) -> Option<usize> {
        self.members.iter().position(|m| m.lecturer.id == lecturer_id)
    }

    pub fn is_member(&self, lecturer_id: DbId) -> bool {
        self.position(lecturer_id).is_some()
    }

    /// Add a lecturer with an assignable role.
    pub fn add(&mut self, lecturer: LecturerSummary, role: CourseRole) -> Result<(), MemberError> {
        if !role.is_editable() {
            return Err(MemberError::AuthorLocked);
        }
        if self.is_member(lecturer.id) {
            return Err(MemberError::AlreadyMember(lecturer.id));
        }
        self.members.push(CourseMember {
            lecturer,
            course_role: role,
        });
        Ok(())
    }

    pub fn change_role(&mut self, lecturer_id: DbId, role: CourseRole) -> Result<(), MemberError> {
        let idx = self
            .position(lecturer_id)
            .ok_or(MemberError::NotMember(lecturer_id))?;
        let member = &mut self.members[idx];
        if !member.course_role.is_editable() || !role.is_editable() {
            return Err(MemberError::AuthorLocked);
        }
        member.course_role = role;
        Ok(())
    }

    pub fn remove(&mut self, lecturer_id: DbId) -> Result<CourseMember, MemberError> {
        let idx = self
            .position(lecturer_id)
            .ok_or(MemberError::NotMember(lecturer_id))?;
        if !self.members[idx].course_role.is_editable() {
            return Err(MemberError::AuthorLocked);
        }
        Ok(self.members.remove(idx))
    }

    /// Rows for rendering. AUTHOR rows never expose remove or role controls.
    pub fn rows(&self) -> Vec<MemberRow> {
        self.members
            .iter()
            .map(|m| {
                let editable = m.course_role.is_editable();
                MemberRow {
                    lecturer: m.lecturer.clone(),
                    role: m.course_role,
                    removable: editable,
                    role_editable: editable,
                }
            })
            .collect()
    }

    /// Search the candidate pool, excluding current members, capped at
    /// [`CANDIDATE_LIMIT`]. Matching is a case-insensitive substring match on
    /// name or email; an empty query lists the first candidates.
    pub fn candidates<'a>(
        &self,
        pool: &'a [LecturerSummary],
        query: &str,
    ) -> Vec<&'a LecturerSummary> {
        let needle = query.trim().to_lowercase();
        pool.iter()
            .filter(|l| !self.is_member(l.id))
            .filter(|l| {
                needle.is_empty()
                    || l.full_name.to_lowercase().contains(&needle)
                    || l
                        .email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .take(CANDIDATE_LIMIT)
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.members != self.original
    }

    /// Discard local edits.
    pub fn reset(&mut self) {
        self.members = self.original.clone();
    }

    /// The full replacement array sent on save.
    pub fn payload(&self) -> Vec<CourseMemberPayload> {
        self.members
            .iter()
            .map(|m| CourseMemberPayload {
                lecturer_id: m.lecturer.id,
                course_role: m.course_role,
            })
            .collect()
    }
}
