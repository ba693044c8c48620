//! Domain types and pure logic for the EduHub admin console.
//!
//! Nothing in this crate performs I/O. The HTTP client, event plumbing and
//! workflow orchestration live in `eduhub-client`, `eduhub-events` and
//! `eduhub-console`.

pub mod approval;
pub mod business_errors;
pub mod course_members;
pub mod diff;
pub mod error;
pub mod listing;
pub mod messages;
pub mod models;
pub mod requests;
pub mod resubmission;
pub mod review;
pub mod status;
pub mod toast;
pub mod types;
