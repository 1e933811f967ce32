//! Error types module
//!
//! Rejection reasons produced by the validation pipeline. The set is closed:
//! every failure an upload can hit maps onto one of these kinds and is
//! reported back to the caller as part of a [`ValidationOutcome`], never as
//! a panic or a propagated exception.
//!
//! [`ValidationOutcome`]: crate::models::ValidationOutcome

use serde::{Deserialize, Serialize};

/// Log level a caller should use when reporting a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected rejections of bad user input
    Debug,
    /// Warning level - for suspicious input worth operator attention
    Warn,
    /// Error level - for environmental failures (permissions, disk full)
    Error,
}

/// Closed set of rejection reasons.
///
/// The `Display` strings here are safe for end users; anything more specific
/// (decoder messages, filesystem errors) belongs in [`ValidationError::message`]
/// and should stay server-side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    #[error("upload transport failed")]
    TransportFailure,

    #[error("file exceeds the configured size limit")]
    SizeExceeded,

    #[error("file extension is not allowed")]
    ExtensionRejected,

    #[error("declared content type is not allowed")]
    TypeRejected,

    #[error("file content does not match an allowed format")]
    ContentMismatch,

    #[error("a file with this name already exists")]
    NameCollision,

    #[error("storing the file failed")]
    StorageFailure,
}

impl ValidationErrorKind {
    /// Client-facing message (never includes internal detail).
    pub fn client_message(&self) -> String {
        self.to_string()
    }

    /// Whether the failure is environmental rather than caused by the input.
    ///
    /// Environmental failures indicate infrastructure trouble and may be
    /// worth retrying; input failures are deterministic.
    pub fn is_environmental(&self) -> bool {
        matches!(self, ValidationErrorKind::StorageFailure)
    }

    /// Log level for this rejection.
    pub fn log_level(&self) -> LogLevel {
        match self {
            ValidationErrorKind::StorageFailure => LogLevel::Error,
            ValidationErrorKind::ContentMismatch => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }
}

/// A single violated constraint: the kind plus server-side detail.
///
/// `message` may contain decoder or filesystem error strings and is intended
/// for server-side logs only; render `kind` to end users.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failure_is_environmental() {
        assert!(ValidationErrorKind::StorageFailure.is_environmental());
        assert_eq!(
            ValidationErrorKind::StorageFailure.log_level(),
            LogLevel::Error
        );
    }

    #[test]
    fn test_input_failures_are_not_environmental() {
        for kind in [
            ValidationErrorKind::TransportFailure,
            ValidationErrorKind::SizeExceeded,
            ValidationErrorKind::ExtensionRejected,
            ValidationErrorKind::TypeRejected,
            ValidationErrorKind::ContentMismatch,
            ValidationErrorKind::NameCollision,
        ] {
            assert!(!kind.is_environmental());
        }
    }

    #[test]
    fn test_client_message_hides_detail() {
        let err = ValidationError::new(
            ValidationErrorKind::ContentMismatch,
            "decoder said: unexpected marker 0xDEAD at offset 42",
        );
        let client = err.kind.client_message();
        assert!(!client.contains("0xDEAD"));
        assert!(err.message.contains("0xDEAD"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ValidationErrorKind::SizeExceeded).unwrap();
        assert_eq!(json, "\"size_exceeded\"");
    }
}
