use eduhub_client::{ApiError, TokenStoreError};
use eduhub_core::approval::DialogError;
use eduhub_core::business_errors::{self, BusinessError, Recovery};
use eduhub_core::course_members::MemberError;
use eduhub_core::error::CoreError;
use eduhub_core::messages;
use eduhub_core::toast::Toast;
use tracing::Level;

/// Console-level error type for workflows and commands.
///
/// Every variant maps to exactly one user-facing message through
/// [`ConsoleError::user_message`]. Unexpected failures are shown as the
/// generic message and logged once, by `AppState::report`.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Dialog(#[from] DialogError),

    #[error(transparent)]
    Member(#[from] MemberError),

    #[error(transparent)]
    Token(#[from] TokenStoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An action that the current state does not allow.
    #[error("{0}")]
    NotAllowed(&'static str),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    /// Message and recovery hint for this error.
    pub fn user_message(&self) -> (String, Recovery) {
        match self {
            ConsoleError::Api(api) => match api {
                ApiError::Api { code, message, .. } => {
                    let translation = business_errors::translate(code.as_deref(), message);
                    (translation.message.to_string(), translation.recovery)
                }
                ApiError::SessionExpired => {
                    (messages::SESSION_EXPIRED.to_string(), Recovery::Reauthenticate)
                }
                ApiError::Validation(msg) => (msg.clone(), Recovery::None),
                ApiError::Request(_) => (messages::NETWORK_FAILURE.to_string(), Recovery::None),
                ApiError::Decode(_) | ApiError::Token(_) => {
                    (messages::GENERIC_FAILURE.to_string(), Recovery::None)
                }
            },
            ConsoleError::Core(CoreError::Validation(msg)) => (msg.clone(), Recovery::None),
            ConsoleError::Core(_) | ConsoleError::Token(_) | ConsoleError::Config(_) => {
                (messages::GENERIC_FAILURE.to_string(), Recovery::None)
            }
            ConsoleError::Dialog(e) => (e.to_string(), Recovery::None),
            ConsoleError::Member(e) => (e.to_string(), Recovery::None),
            ConsoleError::NotAllowed(msg) => (msg.to_string(), Recovery::None),
        }
    }

    /// Level at which this failure belongs in the log. `None` for outcomes
    /// the user caused and already sees as a toast.
    pub fn log_level(&self) -> Option<Level> {
        match self {
            ConsoleError::Api(ApiError::Api { code, message, .. }) => {
                let kind = business_errors::translate(code.as_deref(), message).kind;
                (kind == BusinessError::Unknown).then_some(Level::WARN)
            }
            ConsoleError::Api(ApiError::Request(_) | ApiError::Decode(_) | ApiError::Token(_))
            | ConsoleError::Core(CoreError::UnknownKind { .. })
            | ConsoleError::Token(_)
            | ConsoleError::Config(_) => Some(Level::ERROR),
            _ => None,
        }
    }

    /// Write this failure to the log at [`ConsoleError::log_level`].
    pub fn log(&self) {
        match self.log_level() {
            Some(level) if level == Level::ERROR => {
                tracing::error!(error = %self, "Console operation failed")
            }
            Some(_) => tracing::warn!(error = %self, "Unclassified API error"),
            None => {}
        }
    }

    pub fn recovery(&self) -> Recovery {
        self.user_message().1
    }

    pub fn toast(&self) -> Toast {
        Toast::error(self.user_message().0)
    }
}
