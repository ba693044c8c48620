//! Headless view-models for the console's table and dashboard screens.

pub mod dashboard;
pub mod lists;

pub use dashboard::DashboardSummary;
pub use lists::{spawn_debounced, ListScreen};
