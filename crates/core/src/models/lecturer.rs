use serde::{Deserialize, Serialize};

use crate::models::credential::{Certification, Degree};
use crate::status::ApprovalStatus;
use crate::types::{DbId, Timestamp};

/// A lecturer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: DbId,
    pub full_name: String,
    #[serde(default)]
    pub citizen_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub gender: Option<bool>,
    #[serde(default)]
    pub academic_rank: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience_years: Option<i32>,
    #[serde(default)]
    pub job_field: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// The self-service aggregate: the lecturer plus their credential records.
///
/// Each child carries its own status, so a degree can be PENDING while the
/// lecturer is APPROVED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLecturer {
    pub lecturer: Lecturer,
    #[serde(default)]
    pub degrees: Vec<Degree>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}
