use eduhub_core::models::{Course, CourseMember};
use eduhub_core::requests::{CourseForm, CourseMemberPayload, PublishRequest};
use eduhub_core::types::DbId;
use validator::Validate;

use crate::error::ApiError;
use crate::http::{ApiClient, RequestSpec};

const COURSES_PATH: &str = "/api/v1/admin/courses";

impl ApiClient {
    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.fetch(&RequestSpec::get(COURSES_PATH)).await
    }

    pub async fn create_course(&self, form: &CourseForm) -> Result<Course, ApiError> {
        form.validate()?;
        self.fetch(&RequestSpec::post(COURSES_PATH).json(form)?).await
    }

    pub async fn update_course(&self, id: DbId, form: &CourseForm) -> Result<Course, ApiError> {
        form.validate()?;
        self.fetch(&RequestSpec::put(format!("{COURSES_PATH}/{id}")).json(form)?)
            .await
    }

    pub async fn delete_course(&self, id: DbId) -> Result<(), ApiError> {
        self.send(&RequestSpec::delete(format!("{COURSES_PATH}/{id}")))
            .await
    }

    pub async fn publish_course(&self, id: DbId, published: bool) -> Result<(), ApiError> {
        let spec = RequestSpec::patch(format!("{COURSES_PATH}/{id}/publish"))
            .json(&PublishRequest { published })?;
        self.send(&spec).await
    }

    /// `GET /api/v1/admin/courses/{id}/lecturers`.
    pub async fn course_members(&self, course_id: DbId) -> Result<Vec<CourseMember>, ApiError> {
        self.fetch(&RequestSpec::get(format!("{COURSES_PATH}/{course_id}/lecturers")))
            .await
    }

    /// Replace the whole membership array in one call.
    pub async fn replace_course_members(
        &self,
        course_id: DbId,
        members: &[CourseMemberPayload],
    ) -> Result<(), ApiError> {
        let spec =
            RequestSpec::put(format!("{COURSES_PATH}/{course_id}/lecturers")).json(&members)?;
        self.send(&spec).await
    }
}
