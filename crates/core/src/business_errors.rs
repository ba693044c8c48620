//! Translation of backend failures into admin-facing messages.
//!
//! [`translate`] is the single place where server errors are classified.
//! The structured `code` from the error envelope is checked first; only when
//! it is missing or unknown does the message text get matched against known
//! substrings. Anything unrecognised falls back to the generic message.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::messages;

/// Known business failures the console reports with a specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessError {
    DuplicateRegistrationNumber,
    DuplicateCitizenId,
    DuplicateEmail,
    DuplicateTaxCode,
    AlreadyResolved,
    NotFound,
    Unknown,
}

/// What the console should do after showing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Nothing beyond the toast.
    None,
    /// Refetch the affected aggregate and rebuild local state.
    Reload,
    /// Send the user to the login screen.
    Reauthenticate,
}

impl BusinessError {
    pub const KNOWN: [BusinessError; 6] = [
        Self::DuplicateRegistrationNumber,
        Self::DuplicateCitizenId,
        Self::DuplicateEmail,
        Self::DuplicateTaxCode,
        Self::AlreadyResolved,
        Self::NotFound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateRegistrationNumber => "DUPLICATE_REGISTRATION_NUMBER",
            Self::DuplicateCitizenId => "DUPLICATE_CITIZEN_ID",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::DuplicateTaxCode => "DUPLICATE_TAX_CODE",
            Self::AlreadyResolved => "ALREADY_RESOLVED",
            Self::NotFound => "NOT_FOUND",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::DuplicateRegistrationNumber => messages::DUPLICATE_REGISTRATION_NUMBER,
            Self::DuplicateCitizenId => messages::DUPLICATE_CITIZEN_ID,
            Self::DuplicateEmail => messages::DUPLICATE_EMAIL,
            Self::DuplicateTaxCode => messages::DUPLICATE_TAX_CODE,
            Self::AlreadyResolved => messages::ALREADY_RESOLVED,
            Self::NotFound => messages::NOT_FOUND,
            Self::Unknown => messages::GENERIC_FAILURE,
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            // The local aggregate is stale once another profile owns the id.
            Self::DuplicateCitizenId => Recovery::Reload,
            _ => Recovery::None,
        }
    }

    /// Classify a structured error code. Aliases the backend has used for the
    /// same condition map to one variant.
    pub fn from_code(code: &str) -> Option<Self> {
        let found = match code.trim().to_ascii_uppercase().as_str() {
            "DUPLICATE_REGISTRATION_NUMBER" | "BUSINESS_REGISTRATION_NUMBER_EXISTS" => {
                Self::DuplicateRegistrationNumber
            }
            "DUPLICATE_CITIZEN_ID" | "CITIZEN_ID_EXISTS" => Self::DuplicateCitizenId,
            "DUPLICATE_EMAIL" | "EMAIL_EXISTS" => Self::DuplicateEmail,
            "DUPLICATE_TAX_CODE" | "TAX_CODE_EXISTS" => Self::DuplicateTaxCode,
            "ALREADY_RESOLVED" | "ALREADY_APPROVED" | "ALREADY_REJECTED" => Self::AlreadyResolved,
            "NOT_FOUND" => Self::NotFound,
            _ => return None,
        };
        Some(found)
    }

    /// Classify free-form message text.
    pub fn from_message(message: &str) -> Option<Self> {
        MESSAGE_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(message))
            .map(|(_, kind)| *kind)
    }
}

impl std::fmt::Display for BusinessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const DUPLICATE: &str = r"already|exist|duplicate|tồn\s*tại|được\s*sử\s*dụng";

/// A field name and a duplication word, in either order.
fn duplicate_of(field: &str) -> String {
    format!(r"(?i)(?:(?:{field}).*(?:{DUPLICATE})|(?:{DUPLICATE}).*(?:{field}))")
}

// Order matters: the duplicate patterns run before "not found".
static MESSAGE_PATTERNS: LazyLock<Vec<(Regex, BusinessError)>> = LazyLock::new(|| {
    [
        (
            duplicate_of(r"business\s*registration|registration\s*number|số\s*đăng\s*ký"),
            BusinessError::DuplicateRegistrationNumber,
        ),
        (duplicate_of(r"citizen\s*id|cccd|cmnd"), BusinessError::DuplicateCitizenId),
        (duplicate_of(r"tax\s*code|mã\s*số\s*thuế"), BusinessError::DuplicateTaxCode),
        (duplicate_of("email"), BusinessError::DuplicateEmail),
        (
            concat!(
                r"(?i)already\s+(been\s+)?(approved|rejected|resolved|processed)",
                r"|đã\s+được\s+(duyệt|xử\s*lý)",
            )
            .to_string(),
            BusinessError::AlreadyResolved,
        ),
        (r"(?i)not\s*found|không\s+tìm\s+thấy".to_string(), BusinessError::NotFound),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(&pattern).expect("valid regex"), kind))
    .collect()
});

/// The outcome of translating one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub kind: BusinessError,
    pub message: &'static str,
    pub recovery: Recovery,
}

/// Classify a backend failure from its envelope `code` and `message`.
pub fn translate(code: Option<&str>, message: &str) -> Translation {
    let kind = code
        .and_then(BusinessError::from_code)
        .or_else(|| BusinessError::from_message(message))
        .unwrap_or(BusinessError::Unknown);

    Translation {
        kind,
        message: kind.message(),
        recovery: kind.recovery(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_round_trips_through_as_str() {
        for kind in BusinessError::KNOWN {
            assert_eq!(BusinessError::from_code(kind.as_str()), Some(kind));
        }
        assert_eq!(BusinessError::from_code("UNKNOWN"), None);
    }

    #[test]
    fn code_aliases_are_recognised() {
        let cases = [
            ("BUSINESS_REGISTRATION_NUMBER_EXISTS", BusinessError::DuplicateRegistrationNumber),
            ("CITIZEN_ID_EXISTS", BusinessError::DuplicateCitizenId),
            ("email_exists", BusinessError::DuplicateEmail),
            ("TAX_CODE_EXISTS", BusinessError::DuplicateTaxCode),
            ("ALREADY_APPROVED", BusinessError::AlreadyResolved),
            ("ALREADY_REJECTED", BusinessError::AlreadyResolved),
        ];
        for (code, expected) in cases {
            assert_eq!(BusinessError::from_code(code), Some(expected), "{code}");
        }
    }

    #[test]
    fn message_substrings_are_recognised() {
        let cases = [
            (
                "Business registration number already exists",
                BusinessError::DuplicateRegistrationNumber,
            ),
            ("Số đăng ký kinh doanh đã tồn tại", BusinessError::DuplicateRegistrationNumber),
            ("Citizen ID already in use", BusinessError::DuplicateCitizenId),
            ("CCCD đã tồn tại", BusinessError::DuplicateCitizenId),
            ("Email already exists", BusinessError::DuplicateEmail),
            ("Email đã được sử dụng", BusinessError::DuplicateEmail),
            ("Tax code already registered", BusinessError::DuplicateTaxCode),
            ("Mã số thuế đã tồn tại", BusinessError::DuplicateTaxCode),
            ("Request has already been approved", BusinessError::AlreadyResolved),
            ("Yêu cầu đã được xử lý", BusinessError::AlreadyResolved),
            ("Partner not found", BusinessError::NotFound),
            ("Không tìm thấy giảng viên", BusinessError::NotFound),
        ];
        for (message, expected) in cases {
            assert_eq!(BusinessError::from_message(message), Some(expected), "{message}");
        }
    }

    #[test]
    fn field_names_alone_are_not_duplicates() {
        let cases = [
            ("Citizen ID must have 12 digits", None),
            ("Invalid CCCD format", None),
            ("Registration number is required", None),
            ("Email format is invalid", None),
            ("Tax code not found", Some(BusinessError::NotFound)),
            ("Duplicate citizen id", Some(BusinessError::DuplicateCitizenId)),
        ];
        for (message, expected) in cases {
            assert_eq!(BusinessError::from_message(message), expected, "{message}");
        }
        let t = translate(None, "Invalid CCCD format");
        assert_eq!(t.kind, BusinessError::Unknown);
        assert_eq!(t.recovery, Recovery::None);
    }

    #[test]
    fn structured_code_wins_over_message() {
        let t = translate(Some("DUPLICATE_EMAIL"), "Partner not found");
        assert_eq!(t.kind, BusinessError::DuplicateEmail);
        assert_eq!(t.message, messages::DUPLICATE_EMAIL);
    }

    #[test]
    fn unknown_code_falls_back_to_message() {
        let t = translate(Some("CONFLICT"), "Tax code already registered");
        assert_eq!(t.kind, BusinessError::DuplicateTaxCode);
    }

    #[test]
    fn unrecognised_failure_is_generic() {
        let t = translate(None, "Internal server error");
        assert_eq!(t.kind, BusinessError::Unknown);
        assert_eq!(t.message, messages::GENERIC_FAILURE);
        assert_eq!(t.recovery, Recovery::None);
    }

    #[test]
    fn duplicate_citizen_id_requests_reload() {
        let t = translate(None, "citizen id already exists");
        assert_eq!(t.recovery, Recovery::Reload);
        for kind in BusinessError::KNOWN {
            if kind != BusinessError::DuplicateCitizenId {
                assert_eq!(kind.recovery(), Recovery::None);
            }
        }
    }
}
