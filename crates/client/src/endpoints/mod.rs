//! Typed endpoint methods on [`ApiClient`](crate::http::ApiClient), grouped
//! by backend role prefix.

pub mod auth;
pub mod courses;
pub mod review;
pub mod self_service;

pub use review::Collection;
