//! Error types for Llavero.
//!
//! All errors implement `std::error::Error` and provide human-readable
//! messages. There is intentionally one failure family for platform calls:
//! a Security.framework status code plus the message the framework renders
//! for it. Nothing is retried or recovered internally.

use thiserror::Error;

/// `errSecItemNotFound`: the item does not exist in the keychain.
pub const ERR_SEC_ITEM_NOT_FOUND: i32 = -25300;

/// `errSecDuplicateItem`: an item with the same key already exists.
pub const ERR_SEC_DUPLICATE_ITEM: i32 = -25299;

/// `errSecAuthFailed`: authorization or authentication failed.
pub const ERR_SEC_AUTH_FAILED: i32 = -25293;

/// `errSecUserCanceled`: the user canceled the operation.
pub const ERR_SEC_USER_CANCELED: i32 = -128;

/// Message used when the platform's own error-message lookup fails.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Primary error type for Llavero operations.
///
/// Each variant provides sufficient context for debugging while remaining
/// actionable for programmatic error handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The OS keychain is not available on this platform.
    ///
    /// This is the normal outcome on non-macOS systems. Applications should
    /// handle it gracefully.
    #[error("keychain not available on this platform")]
    NotAvailable,

    /// Security.framework returned an error status.
    ///
    /// The message is the framework's own rendering of the status code
    /// (via `SecCopyErrorMessageString`), falling back to a fixed
    /// "Unknown error" string when that lookup fails.
    #[error("Security framework error (code {code}): {message}")]
    Security {
        /// The OSStatus error code.
        code: i32,
        /// Human-readable message rendered by the framework.
        message: String,
    },

    /// Invalid input was provided to an API.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what was invalid.
        reason: String,
    },
}

/// Result type alias for Llavero operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new `NotAvailable` error.
    #[must_use]
    pub const fn not_available() -> Self {
        Self::NotAvailable
    }

    /// Create a new `Security` error from an OSStatus code and its
    /// rendered message.
    #[must_use]
    pub fn security(code: i32, message: impl Into<String>) -> Self {
        Self::Security {
            code,
            message: message.into(),
        }
    }

    /// Create a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Check if this error indicates the keychain is unavailable.
    #[must_use]
    pub const fn is_not_available(&self) -> bool {
        matches!(self, Self::NotAvailable)
    }

    /// Check if this error is the platform's not-found status
    /// (`errSecItemNotFound`).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Security {
                code: ERR_SEC_ITEM_NOT_FOUND,
                ..
            }
        )
    }

    /// Check if this error is the platform's duplicate-item status
    /// (`errSecDuplicateItem`).
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::Security {
                code: ERR_SEC_DUPLICATE_ITEM,
                ..
            }
        )
    }

    /// Get the OSStatus code if this is a Security error.
    #[must_use]
    pub const fn error_code(&self) -> Option<i32> {
        match self {
            Self::Security { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = Error::security(
            ERR_SEC_ITEM_NOT_FOUND,
            "The specified item could not be found in the keychain.",
        );
        let msg = err.to_string();
        assert!(msg.contains("-25300"));
        assert!(msg.contains("could not be found"));
    }

    #[test]
    fn test_not_available_message() {
        let err = Error::not_available();
        let msg = err.to_string();
        assert!(msg.contains("not available"));
    }

    #[test]
    fn test_display_impl_not_generic() {
        let errors = vec![
            Error::not_available(),
            Error::security(0, "no error"),
            Error::security(-25300, UNKNOWN_ERROR_MESSAGE),
            Error::invalid_input("host cannot be empty"),
        ];

        for err in errors {
            let msg = err.to_string();
            assert!(msg.len() > 10, "Message too short: {msg}");
            assert!(!msg.eq_ignore_ascii_case("error"), "Generic message: {msg}");
        }
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::not_available().is_not_available());
        assert!(!Error::security(0, "ok").is_not_available());

        assert!(Error::security(ERR_SEC_ITEM_NOT_FOUND, "missing").is_not_found());
        assert!(!Error::security(ERR_SEC_DUPLICATE_ITEM, "dup").is_not_found());
        assert!(!Error::not_available().is_not_found());

        assert!(Error::security(ERR_SEC_DUPLICATE_ITEM, "dup").is_duplicate());
        assert!(!Error::security(ERR_SEC_AUTH_FAILED, "auth").is_duplicate());
    }

    #[test]
    fn test_error_code_extraction() {
        assert_eq!(Error::security(-25300, "missing").error_code(), Some(-25300));
        assert_eq!(Error::security(-128, "canceled").error_code(), Some(-128));
        assert_eq!(Error::not_available().error_code(), None);
        assert_eq!(Error::invalid_input("bad").error_code(), None);
    }

    #[test]
    fn test_error_equality() {
        let e1 = Error::security(-25300, "missing");
        let e2 = Error::security(-25300, "missing");
        let e3 = Error::security(-25299, "dup");

        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
    }

    #[test]
    fn test_error_clone() {
        let e1 = Error::security(-25293, "auth failed");
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }

    #[test]
    fn test_error_debug() {
        let err = Error::security(-25300, "missing");
        let debug = format!("{err:?}");
        assert!(debug.contains("Security"));
        assert!(debug.contains("-25300"));
    }

    #[test]
    fn test_well_known_status_codes() {
        assert_eq!(ERR_SEC_ITEM_NOT_FOUND, -25300);
        assert_eq!(ERR_SEC_DUPLICATE_ITEM, -25299);
        assert_eq!(ERR_SEC_AUTH_FAILED, -25293);
        assert_eq!(ERR_SEC_USER_CANCELED, -128);
    }
}
