//! Upload policy
//!
//! [`UploadPolicy`] is the immutable configuration one validation call runs
//! against: size limit, extension and content-type allow-lists, content
//! handling mode, destination directory, and naming strategy. Construct it
//! directly, or load it from the environment via
//! [`UploadPolicy::from_env`](crate::config).

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, PathBuf};

/// How stored files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingStrategy {
    /// Cryptographically random identifier plus the sniffed extension.
    #[default]
    Random,
    /// Declared filename stripped to `[A-Za-z0-9._-]`; collisions are rejected.
    SanitizedOriginal,
}

impl NamingStrategy {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "random" => Ok(NamingStrategy::Random),
            "sanitized-original" => Ok(NamingStrategy::SanitizedOriginal),
            _ => Err(anyhow!("Invalid naming strategy: {}", s)),
        }
    }
}

/// What happens to accepted content before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentHandling {
    /// Decode and freshly re-encode, discarding trailing bytes and metadata.
    #[default]
    DecodeReencode,
    /// Keep the original encoding; strip EXIF where the format carries it.
    SignatureOnly,
}

impl ContentHandling {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "decode-reencode" => Ok(ContentHandling::DecodeReencode),
            "signature-only" => Ok(ContentHandling::SignatureOnly),
            _ => Err(anyhow!("Invalid content handling mode: {}", s)),
        }
    }
}

/// Immutable per-call configuration for the validation pipeline.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size_bytes: usize,
    /// Lowercase extensions without the leading dot.
    pub allowed_extensions: Vec<String>,
    /// Lowercase MIME types.
    pub allowed_content_types: Vec<String>,
    pub content_handling: ContentHandling,
    pub destination_dir: PathBuf,
    pub naming: NamingStrategy,
}

impl UploadPolicy {
    /// Policy with the default image allow-lists and a 10 MB cap.
    pub fn new(destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: ["jpg", "jpeg", "png", "gif", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_content_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            content_handling: ContentHandling::default(),
            destination_dir: destination_dir.into(),
            naming: NamingStrategy::default(),
        }
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        let normalized = extension.to_lowercase();
        self.allowed_extensions.iter().any(|e| e == &normalized)
    }

    pub fn allows_content_type(&self, content_type: &str) -> bool {
        let normalized = content_type.to_lowercase();
        self.allowed_content_types.iter().any(|ct| ct == &normalized)
    }

    /// Reject inconsistent policies before any request is processed.
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow!("max_file_size_bytes must be greater than zero"));
        }
        if self.allowed_extensions.is_empty() {
            return Err(anyhow!("allowed_extensions must not be empty"));
        }
        if self.allowed_content_types.is_empty() {
            return Err(anyhow!("allowed_content_types must not be empty"));
        }
        if self.destination_dir.as_os_str().is_empty() {
            return Err(anyhow!("destination_dir must be set"));
        }
        if self
            .destination_dir
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(anyhow!(
                "destination_dir must not contain parent-directory components"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_validates() {
        let policy = UploadPolicy::new("/tmp/filegate");
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_allows_extension_case_insensitive() {
        let policy = UploadPolicy::new("/tmp/filegate");
        assert!(policy.allows_extension("jpg"));
        assert!(policy.allows_extension("JPG"));
        assert!(!policy.allows_extension("exe"));
    }

    #[test]
    fn test_allows_content_type_case_insensitive() {
        let policy = UploadPolicy::new("/tmp/filegate");
        assert!(policy.allows_content_type("image/jpeg"));
        assert!(policy.allows_content_type("IMAGE/PNG"));
        assert!(!policy.allows_content_type("application/x-php"));
    }

    #[test]
    fn test_zero_max_size_rejected() {
        let mut policy = UploadPolicy::new("/tmp/filegate");
        policy.max_file_size_bytes = 0;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        let mut policy = UploadPolicy::new("/tmp/filegate");
        policy.allowed_extensions.clear();
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_traversal_in_destination_rejected() {
        let policy = UploadPolicy::new("/var/data/../../etc");
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_naming_strategy_parse() {
        assert_eq!(
            NamingStrategy::parse("random").unwrap(),
            NamingStrategy::Random
        );
        assert_eq!(
            NamingStrategy::parse("Sanitized-Original").unwrap(),
            NamingStrategy::SanitizedOriginal
        );
        assert!(NamingStrategy::parse("keep").is_err());
    }

    #[test]
    fn test_content_handling_parse() {
        assert_eq!(
            ContentHandling::parse("decode-reencode").unwrap(),
            ContentHandling::DecodeReencode
        );
        assert_eq!(
            ContentHandling::parse("signature-only").unwrap(),
            ContentHandling::SignatureOnly
        );
        assert!(ContentHandling::parse("raw").is_err());
    }
}
