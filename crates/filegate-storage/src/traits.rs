//! Storage abstraction trait
//!
//! This module defines the [`ArtifactStore`] trait that all storage backends
//! must implement, together with the storage error type.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Target name already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid artifact name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The pipeline only ever talks to storage through this trait, so a backend
/// over an object store can be substituted as long as it honors the commit
/// contract described in the crate root documentation.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `data` to a temporary location and atomically publish it under
    /// `name`, failing with [`StorageError::AlreadyExists`] if the name is
    /// taken. Returns the final path of the stored artifact.
    ///
    /// On any failure the temporary file is removed; nothing is ever left at
    /// the final name unless the whole commit succeeded.
    async fn commit(&self, name: &str, data: Vec<u8>) -> StorageResult<PathBuf>;

    /// Check whether an artifact with this name exists.
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Read back a stored artifact.
    async fn read(&self, name: &str) -> StorageResult<Vec<u8>>;

    /// Delete a stored artifact. Deleting a missing artifact is not an error.
    async fn delete(&self, name: &str) -> StorageResult<()>;
}
