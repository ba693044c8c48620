//! The [`Reviewable`] trait: what the generic approval workflow needs to know
//! about an entity kind.
//!
//! Each implementation supplies identity, review state and a list of
//! rendered [`Field`]s. The comparison view diffs those fields, so adding a
//! field to an entity only requires touching its `fields` impl.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Certification, Degree, Institution, Lecturer, Partner};
use crate::status::{ApprovalStatus, EntityKind};
use crate::types::DbId;

/// One labelled, display-ready field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Machine name, matches the JSON key.
    pub name: &'static str,
    /// Vietnamese label shown in detail and diff views.
    pub label: &'static str,
    /// Rendered value; `None` when the backend sent nothing.
    pub value: Option<String>,
}

impl Field {
    fn new(name: &'static str, label: &'static str, value: Option<String>) -> Self {
        // Blank strings are treated like missing values.
        let value = value.filter(|v| !v.trim().is_empty());
        Self { name, label, value }
    }
}

fn text(v: &Option<String>) -> Option<String> {
    v.clone()
}

fn shown<T: std::fmt::Display>(v: &Option<T>) -> Option<String> {
    v.as_ref().map(ToString::to_string)
}

/// An entity that moves through PENDING → APPROVED/REJECTED under admin review.
pub trait Reviewable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> DbId;
    fn status(&self) -> ApprovalStatus;
    fn admin_note(&self) -> Option<&str>;
    /// Name shown in table rows and toasts.
    fn display_name(&self) -> &str;
    /// Address used for outbound notifications, when the entity has one.
    fn contact_email(&self) -> Option<&str> {
        None
    }
    /// Field renderers for the detail and comparison views.
    fn fields(&self) -> Vec<Field>;
}

impl Reviewable for Partner {
    const KIND: EntityKind = EntityKind::Partner;

    fn id(&self) -> DbId {
        self.id
    }
    fn status(&self) -> ApprovalStatus {
        self.status
    }
    fn admin_note(&self) -> Option<&str> {
        self.admin_note.as_deref()
    }
    fn display_name(&self) -> &str {
        &self.organization_name
    }
    fn contact_email(&self) -> Option<&str> {
        self.email.as_deref()
    }
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("organizationName", "Tên tổ chức", Some(self.organization_name.clone())),
            Field::new("industry", "Lĩnh vực", text(&self.industry)),
            Field::new(
                "businessRegistrationNumber",
                "Số đăng ký kinh doanh",
                text(&self.business_registration_number),
            ),
            Field::new("email", "Email", text(&self.email)),
            Field::new("phoneNumber", "Số điện thoại", text(&self.phone_number)),
            Field::new("website", "Website", text(&self.website)),
            Field::new("address", "Địa chỉ", text(&self.address)),
            Field::new("description", "Mô tả", text(&self.description)),
            Field::new("logoUrl", "Logo", text(&self.logo_url)),
            Field::new("representativeName", "Người đại diện", text(&self.representative_name)),
            Field::new(
                "representativePosition",
                "Chức vụ người đại diện",
                text(&self.representative_position),
            ),
        ]
    }
}

impl Reviewable for Institution {
    const KIND: EntityKind = EntityKind::Institution;

    fn id(&self) -> DbId {
        self.id
    }
    fn status(&self) -> ApprovalStatus {
        self.status
    }
    fn admin_note(&self) -> Option<&str> {
        self.admin_note.as_deref()
    }
    fn display_name(&self) -> &str {
        &self.institution_name
    }
    fn contact_email(&self) -> Option<&str> {
        self.email.as_deref()
    }
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("institutionName", "Tên cơ sở", Some(self.institution_name.clone())),
            Field::new("institutionType", "Loại hình", text(&self.institution_type)),
            Field::new("taxCode", "Mã số thuế", text(&self.tax_code)),
            Field::new("email", "Email", text(&self.email)),
            Field::new("phoneNumber", "Số điện thoại", text(&self.phone_number)),
            Field::new("website", "Website", text(&self.website)),
            Field::new("address", "Địa chỉ", text(&self.address)),
            Field::new("description", "Mô tả", text(&self.description)),
            Field::new("logoUrl", "Logo", text(&self.logo_url)),
            Field::new("representativeName", "Người đại diện", text(&self.representative_name)),
            Field::new(
                "representativePosition",
                "Chức vụ người đại diện",
                text(&self.representative_position),
            ),
            Field::new("establishedYear", "Năm thành lập", shown(&self.established_year)),
        ]
    }
}

impl Reviewable for Lecturer {
    const KIND: EntityKind = EntityKind::Lecturer;

    fn id(&self) -> DbId {
        self.id
    }
    fn status(&self) -> ApprovalStatus {
        self.status
    }
    fn admin_note(&self) -> Option<&str> {
        self.admin_note.as_deref()
    }
    fn display_name(&self) -> &str {
        &self.full_name
    }
    fn contact_email(&self) -> Option<&str> {
        self.email.as_deref()
    }
    fn fields(&self) -> Vec<Field> {
        let gender = self
            .gender
            .map(|male| if male { "Nam" } else { "Nữ" }.to_string());
        vec![
            Field::new("fullName", "Họ và tên", Some(self.full_name.clone())),
            Field::new("citizenId", "Số CCCD", text(&self.citizen_id)),
            Field::new("email", "Email", text(&self.email)),
            Field::new("phoneNumber", "Số điện thoại", text(&self.phone_number)),
            Field::new("dateOfBirth", "Ngày sinh", shown(&self.date_of_birth)),
            Field::new("gender", "Giới tính", gender),
            Field::new("academicRank", "Học hàm/học vị", text(&self.academic_rank)),
            Field::new("specialization", "Chuyên ngành", text(&self.specialization)),
            Field::new("experienceYears", "Số năm kinh nghiệm", shown(&self.experience_years)),
            Field::new("jobField", "Lĩnh vực công việc", text(&self.job_field)),
            Field::new("bio", "Giới thiệu", text(&self.bio)),
            Field::new("avatarUrl", "Ảnh đại diện", text(&self.avatar_url)),
            Field::new("address", "Địa chỉ", text(&self.address)),
        ]
    }
}

impl Reviewable for Degree {
    const KIND: EntityKind = EntityKind::Degree;

    fn id(&self) -> DbId {
        self.id
    }
    fn status(&self) -> ApprovalStatus {
        self.status
    }
    fn admin_note(&self) -> Option<&str> {
        self.admin_note.as_deref()
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("referenceId", "Mã tham chiếu", text(&self.reference_id)),
            Field::new("name", "Tên bằng cấp", Some(self.name.clone())),
            Field::new("major", "Chuyên ngành", text(&self.major)),
            Field::new("institution", "Nơi cấp", text(&self.institution)),
            Field::new("startYear", "Năm bắt đầu", shown(&self.start_year)),
            Field::new("graduationYear", "Năm tốt nghiệp", shown(&self.graduation_year)),
            Field::new("level", "Trình độ", text(&self.level)),
            Field::new("url", "Tệp đính kèm", text(&self.url)),
            Field::new("description", "Mô tả", text(&self.description)),
        ]
    }
}

impl Reviewable for Certification {
    const KIND: EntityKind = EntityKind::Certification;

    fn id(&self) -> DbId {
        self.id
    }
    fn status(&self) -> ApprovalStatus {
        self.status
    }
    fn admin_note(&self) -> Option<&str> {
        self.admin_note.as_deref()
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("referenceId", "Mã tham chiếu", text(&self.reference_id)),
            Field::new("name", "Tên chứng chỉ", Some(self.name.clone())),
            Field::new("issuedBy", "Đơn vị cấp", text(&self.issued_by)),
            Field::new("issueDate", "Ngày cấp", shown(&self.issue_date)),
            Field::new("expiryDate", "Ngày hết hạn", shown(&self.expiry_date)),
            Field::new("certificateUrl", "Tệp đính kèm", text(&self.certificate_url)),
            Field::new("level", "Trình độ", text(&self.level)),
            Field::new("description", "Mô tả", text(&self.description)),
        ]
    }
}
