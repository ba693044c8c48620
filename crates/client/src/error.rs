use reqwest::StatusCode;

use crate::tokens::TokenStoreError;

/// Errors from the REST client layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// Structured error code from the envelope, when present.
        code: Option<String>,
        message: String,
    },

    /// The access token was rejected and could not be refreshed. Tokens have
    /// been cleared and the user sent to the login screen.
    #[error("Session expired")]
    SessionExpired,

    /// A success response did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The payload failed client-side validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Token(#[from] TokenStoreError),
}

impl ApiError {
    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(eduhub_core::requests::first_validation_message(&errors))
    }
}
