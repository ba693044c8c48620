use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseType {
    Online,
    Offline,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Course metadata. Membership is fetched separately, see [`CourseMember`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub course_type: Option<CourseType>,
    #[serde(default)]
    pub level: Option<CourseLevel>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub end_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Role a lecturer holds inside one course.
///
/// `Author` is fixed at course creation and can never be changed or removed
/// from the member dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseRole {
    Author,
    Assigned,
    Assistant,
}

impl CourseRole {
    /// Roles an admin may pick in the member dialog.
    pub const ASSIGNABLE: [CourseRole; 2] = [Self::Assigned, Self::Assistant];

    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Author)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Author => "Tác giả",
            Self::Assigned => "Giảng viên phụ trách",
            Self::Assistant => "Trợ giảng",
        }
    }
}

/// The lecturer projection embedded in membership rows and candidate pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerSummary {
    pub id: DbId,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl From<&crate::models::Lecturer> for LecturerSummary {
    fn from(lecturer: &crate::models::Lecturer) -> Self {
        Self {
            id: lecturer.id,
            full_name: lecturer.full_name.clone(),
            email: lecturer.email.clone(),
            avatar_url: lecturer.avatar_url.clone(),
            specialization: lecturer.specialization.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMember {
    pub lecturer: LecturerSummary,
    pub course_role: CourseRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_deserializes_role() {
        let json = r#"{"lecturer":{"id":3,"fullName":"Nguyễn Văn A"},"courseRole":"AUTHOR"}"#;
        let member: CourseMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.course_role, CourseRole::Author);
        assert!(!member.course_role.is_editable());
    }

    #[test]
    fn assignable_roles_exclude_author() {
        assert!(!CourseRole::ASSIGNABLE.contains(&CourseRole::Author));
    }

    #[test]
    fn course_defaults_unpublished_and_free() {
        let course: Course = serde_json::from_str(r#"{"id":1,"title":"Rust cơ bản"}"#).unwrap();
        assert!(!course.is_published);
        assert_eq!(course.price, 0.0);
    }
}
