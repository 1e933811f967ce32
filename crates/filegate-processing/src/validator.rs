//! Structural checks for the cheap validation stages.
//!
//! Each check returns the violated constraint instead of failing fast, so
//! the pipeline can accumulate every structural problem and report them to
//! the caller at once.

use filegate_core::{UploadPolicy, UploadRequest, ValidationError, ValidationErrorKind};
use std::path::Path;

/// Per-request validator over an immutable policy.
pub struct IntakeValidator<'a> {
    policy: &'a UploadPolicy,
}

impl<'a> IntakeValidator<'a> {
    pub fn new(policy: &'a UploadPolicy) -> Self {
        Self { policy }
    }

    /// Size check: bytes actually received against the policy cap.
    ///
    /// Client-declared sizes are never consulted; a spoofed small-size
    /// header changes nothing here.
    pub fn check_size(&self, request: &UploadRequest) -> Option<ValidationError> {
        let size = request.received_size();
        if size > self.policy.max_file_size_bytes {
            return Some(ValidationError::new(
                ValidationErrorKind::SizeExceeded,
                format!(
                    "received {} bytes (max: {} bytes)",
                    size, self.policy.max_file_size_bytes
                ),
            ));
        }
        None
    }

    /// Extension check on the claimed filename. Advisory only.
    pub fn check_extension(&self, request: &UploadRequest) -> Option<ValidationError> {
        let extension = Path::new(&request.declared_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension {
            Some(ext) if self.policy.allows_extension(&ext) => None,
            Some(ext) => Some(ValidationError::new(
                ValidationErrorKind::ExtensionRejected,
                format!(
                    "extension {:?} not in allowed set {:?}",
                    ext, self.policy.allowed_extensions
                ),
            )),
            None => Some(ValidationError::new(
                ValidationErrorKind::ExtensionRejected,
                format!(
                    "filename {:?} has no extension",
                    request.declared_filename
                ),
            )),
        }
    }

    /// Declared content-type check. Advisory only; the content sniff is the
    /// authoritative check.
    pub fn check_declared_type(&self, request: &UploadRequest) -> Option<ValidationError> {
        if self
            .policy
            .allows_content_type(&request.declared_content_type)
        {
            None
        } else {
            Some(ValidationError::new(
                ValidationErrorKind::TypeRejected,
                format!(
                    "declared type {:?} not in allowed set {:?}",
                    request.declared_content_type, self.policy.allowed_content_types
                ),
            ))
        }
    }
}
