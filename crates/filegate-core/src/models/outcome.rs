//! Validation outcome produced once per call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{ValidationError, ValidationErrorKind};

/// Descriptor of a successfully stored artifact.
#[derive(Debug, Clone, Serialize)]
pub struct StoredArtifact {
    pub stored_path: PathBuf,
    pub stored_name: String,
    /// Content type derived from the sniffed format, not the declared one.
    pub content_type: String,
    /// Size of the stored bytes (after re-encoding, where enabled).
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
    pub stored_at: DateTime<Utc>,
}

/// Result of one `validate_and_store` call. Never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub enum ValidationOutcome {
    Accepted(StoredArtifact),
    Rejected { reasons: Vec<ValidationError> },
}

impl ValidationOutcome {
    pub fn rejected(reasons: Vec<ValidationError>) -> Self {
        ValidationOutcome::Rejected { reasons }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    /// The accumulated rejection reasons, in stage order. Empty when accepted.
    pub fn reasons(&self) -> &[ValidationError] {
        match self {
            ValidationOutcome::Accepted(_) => &[],
            ValidationOutcome::Rejected { reasons } => reasons,
        }
    }

    pub fn has_reason(&self, kind: ValidationErrorKind) -> bool {
        self.reasons().iter().any(|r| r.kind == kind)
    }

    pub fn artifact(&self) -> Option<&StoredArtifact> {
        match self {
            ValidationOutcome::Accepted(artifact) => Some(artifact),
            ValidationOutcome::Rejected { .. } => None,
        }
    }
}
