//! Flat DTOs mirrored from the backend.
//!
//! Every struct deserializes from the camelCase JSON the REST API returns.
//! The console keeps no relationships beyond what a single endpoint returns.

pub mod account;
pub mod course;
pub mod credential;
pub mod institution;
pub mod lecturer;
pub mod partner;
pub mod update_request;

pub use account::{Account, AccountRole, TokenPair};
pub use course::{Course, CourseLevel, CourseMember, CourseRole, CourseType, LecturerSummary};
pub use credential::{Certification, Degree};
pub use institution::Institution;
pub use lecturer::{Lecturer, PendingLecturer};
pub use partner::Partner;
pub use update_request::UpdateRequest;
