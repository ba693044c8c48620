//! The course member dialog.
//!
//! Edits are applied to a local [`MemberEditor`]; nothing reaches the backend
//! until [`MemberDialog::save`], which replaces the whole membership list in
//! one request.

use eduhub_core::course_members::{MemberEditor, MemberRow};
use eduhub_core::messages;
use eduhub_core::models::{CourseRole, LecturerSummary};
use eduhub_core::toast::Toast;
use eduhub_core::types::DbId;

use crate::error::ConsoleResult;
use crate::state::AppState;
use crate::store::Action;

pub struct MemberDialog {
    state: AppState,
    editor: MemberEditor,
}

impl MemberDialog {
    /// Fetch the current members of `course_id` and open the dialog on them.
    pub async fn open(state: AppState, course_id: DbId) -> ConsoleResult<Self> {
        let members = state
            .client
            .course_members(course_id)
            .await
            .map_err(|e| state.report(e))?;
        state.dispatch(Action::ReplaceCourseMembers {
            course_id,
            members: members.clone(),
        });
        Ok(Self {
            editor: MemberEditor::new(course_id, members),
            state,
        })
    }

    pub fn course_id(&self) -> DbId {
        self.editor.course_id()
    }

    pub fn rows(&self) -> Vec<MemberRow> {
        self.editor.rows()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    /// Lecturers that could be added, searched among approved lecturers in
    /// the store.
    pub fn candidates(&self, query: &str) -> Vec<LecturerSummary> {
        let snapshot = self.state.store.snapshot();
        let pool: Vec<LecturerSummary> = snapshot
            .lecturers
            .canonical
            .iter()
            .map(LecturerSummary::from)
            .collect();
        self.editor
            .candidates(&pool, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn add(&mut self, lecturer: LecturerSummary, role: CourseRole) -> ConsoleResult<()> {
        self.editor
            .add(lecturer, role)
            .map_err(|e| self.state.report(e))
    }

    pub fn change_role(&mut self, lecturer_id: DbId, role: CourseRole) -> ConsoleResult<()> {
        self.editor
            .change_role(lecturer_id, role)
            .map_err(|e| self.state.report(e))
    }

    pub fn remove(&mut self, lecturer_id: DbId) -> ConsoleResult<()> {
        self.editor
            .remove(lecturer_id)
            .map(|_| ())
            .map_err(|e| self.state.report(e))
    }

    /// Discard local edits.
    pub fn reset(&mut self) {
        self.editor.reset();
    }

    /// Send the full member list. Returns `false` when there was nothing to
    /// save.
    pub async fn save(&mut self) -> ConsoleResult<bool> {
        if !self.editor.is_dirty() {
            self.state.toast(Toast::info(messages::NO_CHANGES));
            return Ok(false);
        }

        let course_id = self.editor.course_id();
        let payload = self.editor.payload();
        self.state
            .client
            .replace_course_members(course_id, &payload)
            .await
            .map_err(|e| self.state.report(e))?;

        tracing::info!(course_id, members = payload.len(), "Course members replaced");
        self.state.toast(Toast::success(messages::SAVE_SUCCESS));

        match self.state.client.course_members(course_id).await {
            Ok(members) => {
                self.state.dispatch(Action::ReplaceCourseMembers {
                    course_id,
                    members: members.clone(),
                });
                self.editor = MemberEditor::new(course_id, members);
            }
            Err(e) => {
                self.state.report(e);
            }
        }
        Ok(true)
    }
}
