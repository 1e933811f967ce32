//! Content canonicalization before commit.
//!
//! Re-encoding decodes the validated bytes and writes a fresh,
//! library-produced encoding in the same format. Bytes appended after a
//! valid trailing marker (polyglot payloads) and ancillary metadata do not
//! survive the round trip, so the stored bytes are never attacker-controlled
//! raw input.

use anyhow::{Context, Result};
use image::{ImageFormat, ImageReader};
use img_parts::{jpeg::Jpeg, png::Png, ImageEXIF};
use std::io::Cursor;

/// Decode `data` and re-encode it fresh as `format`.
pub fn reencode(data: &[u8], format: ImageFormat) -> Result<Vec<u8>> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .context("Format detection failed")?
        .decode()
        .context("Decode failed")?;

    let mut out = Cursor::new(Vec::new());
    match format {
        // JPEG carries no alpha channel; flatten before encoding.
        ImageFormat::Jpeg => img
            .to_rgb8()
            .write_to(&mut out, format)
            .context("Re-encode failed")?,
        _ => img
            .to_rgba8()
            .write_to(&mut out, format)
            .context("Re-encode failed")?,
    }

    Ok(out.into_inner())
}

/// Strip EXIF metadata without re-encoding (signature-only handling).
///
/// Formats that img-parts cannot rewrite pass through unchanged.
pub fn strip_metadata(data: &[u8]) -> Result<Vec<u8>> {
    if let Ok(mut jpeg) = Jpeg::from_bytes(data.to_vec().into()) {
        jpeg.set_exif(None);
        return Ok(jpeg.encoder().bytes().to_vec());
    }

    if let Ok(mut png) = Png::from_bytes(data.to_vec().into()) {
        png.set_exif(None);
        return Ok(png.encoder().bytes().to_vec());
    }

    Ok(data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_reencode_round_trips() {
        let original = png_bytes(32, 16);
        let reencoded = reencode(&original, ImageFormat::Png).unwrap();

        let sniffed = crate::sniff::sniff(&reencoded).unwrap();
        assert_eq!(sniffed.format, ImageFormat::Png);
        assert_eq!((sniffed.width, sniffed.height), (32, 16));
    }

    #[test]
    fn test_reencode_discards_trailing_payload() {
        let marker = b"<?php system($_GET['cmd']); ?>";
        let mut polyglot = png_bytes(16, 16);
        polyglot.extend_from_slice(marker);

        // The polyglot still decodes, but the re-encoded bytes are a fresh
        // encoding with no trace of the appended payload.
        let reencoded = reencode(&polyglot, ImageFormat::Png).unwrap();
        assert!(!reencoded
            .windows(marker.len())
            .any(|window| window == marker));
        assert!(crate::sniff::sniff(&reencoded).is_ok());
    }

    #[test]
    fn test_reencode_rejects_garbage() {
        assert!(reencode(b"definitely not an image", ImageFormat::Png).is_err());
    }

    #[test]
    fn test_reencode_jpeg_flattens_alpha() {
        let original = png_bytes(8, 8);
        let jpeg = reencode(&original, ImageFormat::Jpeg).unwrap();
        let sniffed = crate::sniff::sniff(&jpeg).unwrap();
        assert_eq!(sniffed.format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_strip_metadata_passes_through_unknown_format() {
        let data = b"RIFF....WEBP".to_vec();
        assert_eq!(strip_metadata(&data).unwrap(), data);
    }

    #[test]
    fn test_strip_metadata_keeps_png_decodable() {
        let original = png_bytes(12, 12);
        let stripped = strip_metadata(&original).unwrap();
        assert!(crate::sniff::sniff(&stripped).is_ok());
    }
}
