use crate::local::LocalStore;
use crate::traits::{ArtifactStore, StorageResult};
use filegate_core::UploadPolicy;
use std::sync::Arc;

/// Create a storage backend rooted at the policy's destination directory.
///
/// Currently the local filesystem backend is the only one built in; an
/// object-store backend would be selected here once it exists.
pub async fn create_store(policy: &UploadPolicy) -> StorageResult<Arc<dyn ArtifactStore>> {
    let store = LocalStore::new(&policy.destination_dir).await?;
    Ok(Arc::new(store))
}
