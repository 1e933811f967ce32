//! Byte-level format sniffing.
//!
//! This is the authoritative content check: the actual bytes are decoded
//! with a real image decoder, independent of the claimed filename and the
//! declared content type. Those earlier checks exist only to short-circuit
//! obviously wrong submissions before paying the decode cost here.

use image::{GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SniffError {
    #[error("No known format signature: {0}")]
    UnknownFormat(String),

    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Structurally invalid image: {0}")]
    InvalidStructure(String),
}

/// What the bytes turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SniffedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl SniffedImage {
    /// Canonical extension for the sniffed format. Stored names use this,
    /// never the extension the client claimed.
    pub fn extension(&self) -> &'static str {
        match self.format {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            other => other.extensions_str().first().copied().unwrap_or("bin"),
        }
    }

    /// MIME type for the sniffed format.
    pub fn content_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            other => other.to_mime_type(),
        }
    }
}

/// Sniff and fully decode `data`.
///
/// The format comes from magic bytes; the full decode proves the structure
/// is self-consistent. Degenerate (zero-dimension) images are rejected.
pub fn sniff(data: &[u8]) -> Result<SniffedImage, SniffError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| SniffError::UnknownFormat(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| SniffError::UnknownFormat("no known signature".to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| SniffError::DecodeFailed(e.to_string()))?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(SniffError::InvalidStructure(format!(
            "degenerate dimensions {}x{}",
            width, height
        )));
    }

    Ok(SniffedImage {
        format,
        width,
        height,
    })
}
