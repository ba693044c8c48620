use eduhub_core::error::CoreError;
use eduhub_core::messages;
use eduhub_core::models::Course;
use eduhub_core::requests::CourseForm;
use eduhub_core::toast::Toast;
use eduhub_core::types::DbId;
use tokio::sync::mpsc;
use validator::Validate;

use crate::error::ConsoleResult;
use crate::screens::spawn_debounced;
use crate::state::AppState;
use crate::store::Action;

/// Admin course management. Every successful mutation refetches the course
/// list into the store.
pub struct CourseAdmin {
    state: AppState,
}

impl CourseAdmin {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Search box for the course table. Keystrokes go into the sender and
    /// settled queries come out of the receiver after the configured debounce.
    pub fn search_box(&self) -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
        let (keys, input) = mpsc::channel(32);
        (keys, spawn_debounced(self.state.config.search_debounce(), input))
    }

    pub async fn load(&self) -> ConsoleResult<Vec<Course>> {
        let courses = self
            .state
            .client
            .list_courses()
            .await
            .map_err(|e| self.state.report(e))?;
        self.state.dispatch(Action::ReplaceCourses(courses.clone()));
        Ok(courses)
    }

    pub async fn create(&self, form: &CourseForm) -> ConsoleResult<Course> {
        form.validate()
            .map_err(|e| self.state.report(CoreError::from(e)))?;
        let course = self
            .state
            .client
            .create_course(form)
            .await
            .map_err(|e| self.state.report(e))?;
        self.finish(messages::CREATE_SUCCESS).await;
        Ok(course)
    }

    pub async fn update(&self, id: DbId, form: &CourseForm) -> ConsoleResult<Course> {
        form.validate()
            .map_err(|e| self.state.report(CoreError::from(e)))?;
        let course = self
            .state
            .client
            .update_course(id, form)
            .await
            .map_err(|e| self.state.report(e))?;
        self.finish(messages::SAVE_SUCCESS).await;
        Ok(course)
    }

    pub async fn delete(&self, id: DbId) -> ConsoleResult<()> {
        self.state
            .client
            .delete_course(id)
            .await
            .map_err(|e| self.state.report(e))?;
        self.finish(messages::DELETE_SUCCESS).await;
        Ok(())
    }

    pub async fn set_published(&self, id: DbId, published: bool) -> ConsoleResult<()> {
        self.state
            .client
            .publish_course(id, published)
            .await
            .map_err(|e| self.state.report(e))?;
        self.finish(messages::SAVE_SUCCESS).await;
        Ok(())
    }

    async fn finish(&self, message: &'static str) {
        self.state.toast(Toast::success(message));
        // The mutation already succeeded; a failed refetch is only reported.
        let _ = self.load().await;
    }
}
