//! Failures raised by domain logic before any request is sent.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A request schema rejected its input. Carries the first user-facing message.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown entity kind '{given}'. Must be one of: {expected}")]
    UnknownKind { given: String, expected: String },
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(crate::requests::first_validation_message(&errors))
    }
}
