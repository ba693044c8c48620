//! Degree and certification leaf records owned by a lecturer.
//!
//! Both are created through a modal submission, enter PENDING, and move to
//! APPROVED/REJECTED only through an admin action. The owner may delete
//! them while they are still PENDING.

use serde::{Deserialize, Serialize};

use crate::status::ApprovalStatus;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Degree {
    pub id: DbId,
    #[serde(default)]
    pub reference_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: DbId,
    #[serde(default)]
    pub reference_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub issued_by: Option<String>,
    #[serde(default)]
    pub issue_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub certificate_url: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Degree {
    /// Only PENDING records may be deleted by their owner.
    pub fn is_deletable(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

impl Certification {
    /// Only PENDING records may be deleted by their owner.
    pub fn is_deletable(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_deserializes_with_missing_optionals() {
        let json = r#"{"id":4,"name":"Thạc sĩ CNTT","status":"PENDING"}"#;
        let degree: Degree = serde_json::from_str(json).unwrap();
        assert_eq!(degree.id, 4);
        assert!(degree.url.is_none());
        assert!(degree.is_deletable());
    }

    #[test]
    fn approved_certification_is_not_deletable() {
        let json = r#"{"id":9,"name":"AWS SAA","status":"APPROVED","issueDate":"2023-05-01"}"#;
        let cert: Certification = serde_json::from_str(json).unwrap();
        assert_eq!(
            cert.issue_date,
            chrono::NaiveDate::from_ymd_opt(2023, 5, 1)
        );
        assert!(!cert.is_deletable());
    }
}
