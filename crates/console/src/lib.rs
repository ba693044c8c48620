//! EduHub admin console.
//!
//! A headless rendition of the console: typed store snapshots, list and
//! dashboard view-models, and workflow objects for approvals, lecturer
//! resubmission, course administration and course membership. The
//! `eduhub-console` binary drives these from the command line.

pub mod config;
pub mod error;
pub mod notifications;
pub mod screens;
pub mod state;
pub mod store;
pub mod workflows;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, ConsoleResult};
pub use state::AppState;
