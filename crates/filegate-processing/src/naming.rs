//! Stored-name assignment.

use filegate_core::NamingStrategy;
use uuid::Uuid;

/// Strip a declared filename down to `[A-Za-z0-9._-]`.
///
/// Takes the basename only, rejects `..` sequences outright, and falls back
/// to a fixed name when nothing usable remains.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let path = std::path::Path::new(filename);
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(MAX)
        .collect();
    if s.trim_matches(|c| matches!(c, '.' | '-' | '_')).is_empty() || s.len() < 3 {
        return "file".to_string();
    }
    if s.starts_with('.') {
        // Stripping can leave a leading dot; never store hidden files.
        format!("file{}", s)
    } else {
        s
    }
}

/// Assign the stored name for an accepted upload.
///
/// `sniffed_extension` comes from the content sniff, never from the claimed
/// filename; with the random strategy it is the only part of the request
/// that influences the name.
pub fn assign_name(
    strategy: NamingStrategy,
    declared_filename: &str,
    sniffed_extension: &str,
) -> String {
    match strategy {
        NamingStrategy::Random => format!("{}.{}", Uuid::new_v4(), sniffed_extension),
        NamingStrategy::SanitizedOriginal => sanitize_filename(declared_filename),
    }
}
