//! Intake pipeline: transport → structural checks → sniff → name → re-encode → commit.
//!
//! The pipeline is stateless per call and safe to invoke from any number of
//! concurrent tasks; the only shared state is the destination namespace,
//! which the storage layer guards with an exclusive atomic publish.
//!
//! Only the transport check short-circuits. The structural checks and the
//! content sniff all run and accumulate, so a caller sees every violated
//! constraint in one outcome. Nothing touches the destination directory
//! unless every check passed.

use chrono::Utc;
use std::sync::Arc;

use filegate_core::{
    ContentHandling, NamingStrategy, StoredArtifact, UploadPolicy, UploadRequest,
    ValidationError, ValidationErrorKind, ValidationOutcome,
};
use filegate_storage::{ArtifactStore, StorageError};

use crate::naming::assign_name;
use crate::reencode;
use crate::sniff::{self, SniffedImage};
use crate::validator::IntakeValidator;

/// Validate one submission against a policy and, on success, persist it
/// under a collision-free name.
pub async fn validate_and_store(
    request: &UploadRequest,
    policy: &UploadPolicy,
    store: Arc<dyn ArtifactStore>,
) -> ValidationOutcome {
    // Transport check. The one stage that short-circuits: no further
    // inspection is meaningful on a transfer the runtime aborted.
    if !request.transport.is_completed() {
        return ValidationOutcome::rejected(vec![ValidationError::new(
            ValidationErrorKind::TransportFailure,
            format!("transport reported {:?}", request.transport),
        )]);
    }
    if request.received_size() == 0 {
        return ValidationOutcome::rejected(vec![ValidationError::new(
            ValidationErrorKind::TransportFailure,
            "no bytes received",
        )]);
    }

    let validator = IntakeValidator::new(policy);
    let mut reasons: Vec<ValidationError> = Vec::new();

    // Cheap structural checks, accumulated in stage order.
    reasons.extend(validator.check_size(request));
    reasons.extend(validator.check_extension(request));
    reasons.extend(validator.check_declared_type(request));

    // Authoritative content sniff. Runs even when earlier stages failed so
    // the caller sees all structural problems at once. Decoding is
    // CPU-bound; run it off the async pool.
    let sniffed = match sniff_content(request, policy).await {
        Ok(sniffed) => Some(sniffed),
        Err(error) => {
            reasons.push(error);
            None
        }
    };

    let sniffed = match sniffed {
        Some(sniffed) if reasons.is_empty() => sniffed,
        _ => {
            tracing::debug!(
                filename = %request.declared_filename,
                reasons = reasons.len(),
                "upload rejected"
            );
            return ValidationOutcome::rejected(reasons);
        }
    };

    // Name assignment. The sanitized-original strategy pre-checks for a
    // collision; the remaining check-then-write window is closed by the
    // exclusive commit below.
    let stored_name = assign_name(policy.naming, &request.declared_filename, sniffed.extension());
    if policy.naming == NamingStrategy::SanitizedOriginal {
        match store.exists(&stored_name).await {
            Ok(false) => {}
            Ok(true) => {
                return ValidationOutcome::rejected(vec![ValidationError::new(
                    ValidationErrorKind::NameCollision,
                    format!("{:?} already exists", stored_name),
                )]);
            }
            Err(e) => {
                return ValidationOutcome::rejected(vec![ValidationError::new(
                    ValidationErrorKind::StorageFailure,
                    e.to_string(),
                )]);
            }
        }
    }

    // Canonicalize the content before anything is written.
    let processed = {
        let data = request.data.clone();
        let handling = policy.content_handling;
        let format = sniffed.format;
        let result = tokio::task::spawn_blocking(move || match handling {
            ContentHandling::DecodeReencode => reencode::reencode(&data, format),
            ContentHandling::SignatureOnly => reencode::strip_metadata(&data),
        })
        .await;
        match result {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                return ValidationOutcome::rejected(vec![ValidationError::new(
                    ValidationErrorKind::ContentMismatch,
                    format!("re-encode failed: {}", e),
                )]);
            }
            Err(e) => {
                return ValidationOutcome::rejected(vec![ValidationError::new(
                    ValidationErrorKind::ContentMismatch,
                    format!("re-encode task failed: {}", e),
                )]);
            }
        }
    };

    // Atomic commit: temp file plus exclusive publish inside the store.
    let size_bytes = processed.len() as u64;
    match store.commit(&stored_name, processed).await {
        Ok(stored_path) => {
            tracing::info!(name = %stored_name, size_bytes, "upload stored");
            ValidationOutcome::Accepted(StoredArtifact {
                stored_path,
                stored_name,
                content_type: sniffed.content_type().to_string(),
                size_bytes,
                width: sniffed.width,
                height: sniffed.height,
                stored_at: Utc::now(),
            })
        }
        Err(StorageError::AlreadyExists(_)) => {
            ValidationOutcome::rejected(vec![ValidationError::new(
                ValidationErrorKind::NameCollision,
                format!("{:?} already exists", stored_name),
            )])
        }
        Err(e) => {
            tracing::error!(name = %stored_name, error = %e, "storage commit failed");
            ValidationOutcome::rejected(vec![ValidationError::new(
                ValidationErrorKind::StorageFailure,
                e.to_string(),
            )])
        }
    }
}

/// Run the byte-level sniff and map its failures onto the error taxonomy.
///
/// A clean decode in a format outside the policy's content-type allow-list
/// is still a mismatch: content, not the claimed name, decides what a file
/// is allowed to be.
async fn sniff_content(
    request: &UploadRequest,
    policy: &UploadPolicy,
) -> Result<SniffedImage, ValidationError> {
    let data = request.data.clone();
    let result = tokio::task::spawn_blocking(move || sniff::sniff(&data)).await;

    match result {
        Ok(Ok(sniffed)) => {
            if policy.allows_content_type(sniffed.content_type()) {
                Ok(sniffed)
            } else {
                Err(ValidationError::new(
                    ValidationErrorKind::ContentMismatch,
                    format!(
                        "content decodes as {} which is not in the allowed set",
                        sniffed.content_type()
                    ),
                ))
            }
        }
        Ok(Err(e)) => Err(ValidationError::new(
            ValidationErrorKind::ContentMismatch,
            e.to_string(),
        )),
        Err(e) => Err(ValidationError::new(
            ValidationErrorKind::ContentMismatch,
            format!("sniff task failed: {}", e),
        )),
    }
}
