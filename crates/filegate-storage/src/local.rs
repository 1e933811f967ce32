use crate::traits::{ArtifactStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::fs;

/// Local filesystem store implementation
#[derive(Clone)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore instance
    ///
    /// # Arguments
    /// * `base_path` - Destination directory for committed artifacts
    ///   (e.g., "/var/lib/filegate/media"). Created if missing.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore { base_path })
    }

    /// Resolve an artifact name to its filesystem path with security validation
    ///
    /// Artifact names must be single path components; anything carrying a
    /// separator or a parent-directory reference is rejected before the
    /// filesystem is touched.
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        Ok(self.base_path.join(name))
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn commit(&self, name: &str, data: Vec<u8>) -> StorageResult<PathBuf> {
        let final_path = self.name_to_path(name)?;
        let base_path = self.base_path.clone();
        let name_owned = name.to_string();
        let size = data.len();
        let start = std::time::Instant::now();

        // tempfile's API is synchronous; the write and publish run on the
        // blocking pool. The NamedTempFile guard removes the temp file on
        // every early return, including a lost race on the final name.
        let path = tokio::task::spawn_blocking(move || -> StorageResult<PathBuf> {
            let mut tmp = NamedTempFile::new_in(&base_path).map_err(|e| {
                StorageError::CommitFailed(format!(
                    "Failed to create temp file in {}: {}",
                    base_path.display(),
                    e
                ))
            })?;

            tmp.write_all(&data).map_err(|e| {
                StorageError::CommitFailed(format!("Failed to write temp file: {}", e))
            })?;

            tmp.as_file().sync_all().map_err(|e| {
                StorageError::CommitFailed(format!("Failed to sync temp file: {}", e))
            })?;

            // Atomic exclusive publish: the artifact appears at its final
            // name in one step or not at all.
            match tmp.persist_noclobber(&final_path) {
                Ok(_) => Ok(final_path),
                Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                    Err(StorageError::AlreadyExists(name_owned))
                }
                Err(e) => Err(StorageError::CommitFailed(format!(
                    "Failed to publish {}: {}",
                    final_path.display(),
                    e.error
                ))),
            }
        })
        .await
        .map_err(|e| StorageError::CommitFailed(format!("Commit task failed: {}", e)))??;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store commit successful"
        );

        Ok(path)
    }

    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.name_to_path(name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::CommitFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Ok(data)
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.name_to_path(name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Local store delete successful");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_commit_and_read() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        let data = b"artifact bytes".to_vec();
        let path = store.commit("file.png", data.clone()).await.unwrap();

        assert!(path.ends_with("file.png"));
        assert_eq!(store.read("file.png").await.unwrap(), data);
        assert!(store.exists("file.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_commit_is_exclusive() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        store.commit("taken.png", b"first".to_vec()).await.unwrap();
        let result = store.commit("taken.png", b"second".to_vec()).await;

        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        // The original artifact is untouched by the losing commit.
        assert_eq!(store.read("taken.png").await.unwrap(), b"first".to_vec());
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_no_temp_residue() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        store.commit("only.png", b"data".to_vec()).await.unwrap();
        let _ = store.commit("only.png", b"loser".to_vec()).await;

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("only.png")]);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        for name in ["../escape.png", "a/b.png", "..", "", "nested\\name.png"] {
            let result = store.commit(name, b"x".to_vec()).await;
            assert!(
                matches!(result, Err(StorageError::InvalidName(_))),
                "name {:?} should be rejected",
                name
            );
        }

        assert!(matches!(
            store.read("../../etc/passwd").await,
            Err(StorageError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        assert!(store.delete("missing.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        assert!(matches!(
            store.read("missing.png").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
