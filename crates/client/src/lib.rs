//! Typed HTTP client for the EduHub REST backend.
//!
//! [`ApiClient`] wraps `reqwest` with bearer-token injection and the
//! one-shot refresh flow; tokens persist through a [`TokenStore`].

pub mod endpoints;
pub mod error;
pub mod http;
pub mod tokens;

pub use endpoints::Collection;
pub use error::ApiError;
pub use http::{ApiClient, ClientConfig, FilePart, RequestSpec};
pub use tokens::{
    MemoryTokenStore, SqliteTokenStore, StoredAccessToken, TokenStore, TokenStoreError,
};
