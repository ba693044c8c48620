//! Review lifecycle enums shared by every reviewable entity.
//!
//! Status values are server-authoritative. The only transition the console
//! ever performs locally is forcing `PENDING` on a self-service resubmission.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Review state of a partner, lecturer, institution, degree or certification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Wire representation, also used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Vietnamese label shown in table status badges.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Chờ duyệt",
            Self::Approved => "Đã duyệt",
            Self::Rejected => "Đã từ chối",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five entity kinds that go through the admin approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Partner,
    Lecturer,
    Institution,
    Degree,
    Certification,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        Self::Partner,
        Self::Lecturer,
        Self::Institution,
        Self::Degree,
        Self::Certification,
    ];

    /// Path segment under `/api/v1/admin/`.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Partner => "partners",
            Self::Lecturer => "lecturers",
            Self::Institution => "institutions",
            Self::Degree => "degrees",
            Self::Certification => "certifications",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "partner",
            Self::Lecturer => "lecturer",
            Self::Institution => "institution",
            Self::Degree => "degree",
            Self::Certification => "certification",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Partner => "Đối tác",
            Self::Lecturer => "Giảng viên",
            Self::Institution => "Cơ sở đào tạo",
            Self::Degree => "Bằng cấp",
            Self::Certification => "Chứng chỉ",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.resource() == s)
            .ok_or_else(|| CoreError::UnknownKind {
                given: s.to_string(),
                expected: Self::ALL.map(|k| k.as_str()).join(", "),
            })
    }
}

/// Whether a pending item is a new registration or an edit of an approved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Create,
    Update,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}
