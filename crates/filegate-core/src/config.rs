//! Configuration module
//!
//! Loads an [`UploadPolicy`] from the environment. Every setting except the
//! destination directory has a default, so a deployment only has to set
//! `FILEGATE_DESTINATION_DIR` to get the stock image policy.

use std::env;

use crate::policy::{ContentHandling, NamingStrategy, UploadPolicy};

const MAX_FILE_SIZE_MB: usize = 10;

impl UploadPolicy {
    /// Build a policy from `FILEGATE_*` environment variables.
    ///
    /// `FILEGATE_DESTINATION_DIR` is required; everything else falls back to
    /// the defaults of [`UploadPolicy::new`]. List values are comma-separated
    /// and lowercased.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let destination_dir = env::var("FILEGATE_DESTINATION_DIR")
            .map_err(|_| anyhow::anyhow!("FILEGATE_DESTINATION_DIR must be set"))?;

        let max_file_size_mb = env::var("FILEGATE_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_extensions: Vec<String> = env::var("FILEGATE_ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "jpg,jpeg,png,gif,webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let allowed_content_types: Vec<String> = env::var("FILEGATE_ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| "image/jpeg,image/png,image/gif,image/webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let naming = env::var("FILEGATE_NAMING_STRATEGY")
            .map(|s| NamingStrategy::parse(&s))
            .unwrap_or(Ok(NamingStrategy::default()))?;

        let content_handling = env::var("FILEGATE_CONTENT_HANDLING")
            .map(|s| ContentHandling::parse(&s))
            .unwrap_or(Ok(ContentHandling::default()))?;

        let policy = UploadPolicy {
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            allowed_content_types,
            content_handling,
            destination_dir: destination_dir.into(),
            naming,
        };
        policy.validate()?;

        Ok(policy)
    }
}
