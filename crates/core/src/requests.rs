//! Closed request schemas, one per operation.
//!
//! Every payload that leaves the console is one of these structs and is
//! validated with [`validator`] before the network call. Validation messages
//! are user-facing Vietnamese text so the first failure can be shown as a
//! toast as-is.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{CourseLevel, CourseRole, CourseType, Lecturer};
use crate::status::ApprovalStatus;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", crate::messages::REJECT_REASON_REQUIRED));
    }
    Ok(())
}

fn citizen_id_format(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().all(|c| c.is_ascii_digit());
    if digits && (value.len() == 9 || value.len() == 12) {
        Ok(())
    } else {
        Err(error("citizen_id", "Số CCCD phải gồm 9 hoặc 12 chữ số"))
    }
}

fn phone_format(value: &str) -> Result<(), ValidationError> {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let body = digits.strip_prefix('+').unwrap_or(&digits);
    if (9..=15).contains(&body.len()) && body.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(error("phone", "Số điện thoại không hợp lệ"))
    }
}

/// Return the first validation message, ordered by field name so the
/// result is deterministic.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Trường {field} không hợp lệ"));
                (field.clone(), message)
            })
        })
        .collect();
    fields.sort();

    if let Some((_, message)) = fields.into_iter().next() {
        return message;
    }

    // Struct-level (schema) errors are reported under `__all__`.
    errors
        .errors()
        .values()
        .find_map(|kind| match kind {
            validator::ValidationErrorsKind::Field(errs) => errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string())),
            _ => None,
        })
        .unwrap_or_else(|| "Dữ liệu không hợp lệ".to_string())
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Vui lòng nhập tên đăng nhập"))]
    pub username: String,
    #[validate(length(min = 1, message = "Vui lòng nhập mật khẩu"))]
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Review resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveRequest {
    pub id: DbId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub id: DbId,
    #[validate(custom(function = "not_blank"))]
    pub admin_note: String,
}

// ---------------------------------------------------------------------------
// Lecturer self-service
// ---------------------------------------------------------------------------

/// Full replacement of the lecturer's own profile.
///
/// Degrees and certifications are managed through their own endpoints and
/// are never part of this payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResubmitLecturer {
    pub id: DbId,
    #[validate(length(min = 1, max = 255, message = "Vui lòng nhập họ và tên"))]
    pub full_name: String,
    #[validate(custom(function = "citizen_id_format"))]
    pub citizen_id: Option<String>,
    #[validate(email(message = "Email không hợp lệ"))]
    pub email: Option<String>,
    #[validate(custom(function = "phone_format"))]
    pub phone_number: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub gender: Option<bool>,
    pub academic_rank: Option<String>,
    pub specialization: Option<String>,
    #[validate(range(min = 0, max = 80, message = "Số năm kinh nghiệm không hợp lệ"))]
    pub experience_years: Option<i32>,
    pub job_field: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub address: Option<String>,
    pub status: ApprovalStatus,
}

impl From<&Lecturer> for ResubmitLecturer {
    fn from(l: &Lecturer) -> Self {
        Self {
            id: l.id,
            full_name: l.full_name.clone(),
            citizen_id: l.citizen_id.clone(),
            email: l.email.clone(),
            phone_number: l.phone_number.clone(),
            date_of_birth: l.date_of_birth,
            gender: l.gender,
            academic_rank: l.academic_rank.clone(),
            specialization: l.specialization.clone(),
            experience_years: l.experience_years,
            job_field: l.job_field.clone(),
            bio: l.bio.clone(),
            avatar_url: l.avatar_url.clone(),
            address: l.address.clone(),
            status: l.status,
        }
    }
}

fn degree_years(req: &CreateDegree) -> Result<(), ValidationError> {
    match (req.start_year, req.graduation_year) {
        (Some(start), Some(end)) if end < start => Err(error(
            "years",
            "Năm tốt nghiệp phải sau năm bắt đầu",
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "degree_years"))]
pub struct CreateDegree {
    pub reference_id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Vui lòng nhập tên bằng cấp"))]
    pub name: String,
    pub major: Option<String>,
    #[validate(length(min = 1, message = "Vui lòng nhập nơi cấp"))]
    pub institution: String,
    #[validate(range(min = 1950, max = 2100, message = "Năm bắt đầu không hợp lệ"))]
    pub start_year: Option<i32>,
    #[validate(range(min = 1950, max = 2100, message = "Năm tốt nghiệp không hợp lệ"))]
    pub graduation_year: Option<i32>,
    pub level: Option<String>,
    #[validate(url(message = "Đường dẫn tệp không hợp lệ"))]
    pub url: Option<String>,
    pub description: Option<String>,
}

fn certification_dates(req: &CreateCertification) -> Result<(), ValidationError> {
    match (req.issue_date, req.expiry_date) {
        (Some(issued), Some(expires)) if expires < issued => Err(error(
            "dates",
            "Ngày hết hạn phải sau ngày cấp",
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "certification_dates"))]
pub struct CreateCertification {
    pub reference_id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Vui lòng nhập tên chứng chỉ"))]
    pub name: String,
    #[validate(length(min = 1, message = "Vui lòng nhập đơn vị cấp"))]
    pub issued_by: String,
    pub issue_date: Option<chrono::NaiveDate>,
    pub expiry_date: Option<chrono::NaiveDate>,
    #[validate(url(message = "Đường dẫn tệp không hợp lệ"))]
    pub certificate_url: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

fn course_dates(req: &CourseForm) -> Result<(), ValidationError> {
    match (req.start_date, req.end_date) {
        (Some(start), Some(end)) if end < start => Err(error(
            "dates",
            "Ngày kết thúc phải sau ngày bắt đầu",
        )),
        _ => Ok(()),
    }
}

/// Body of both `POST /admin/courses` and `PUT /admin/courses/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "course_dates"))]
pub struct CourseForm {
    #[validate(length(min = 1, max = 255, message = "Vui lòng nhập tên khóa học"))]
    pub title: String,
    pub course_type: CourseType,
    pub level: CourseLevel,
    pub description: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    #[validate(range(min = 0.0, message = "Học phí không được âm"))]
    pub price: f64,
    pub is_published: bool,
    #[validate(url(message = "Đường dẫn ảnh không hợp lệ"))]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

/// One entry of the membership replacement array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMemberPayload {
    pub lecturer_id: DbId,
    pub course_role: CourseRole,
}
