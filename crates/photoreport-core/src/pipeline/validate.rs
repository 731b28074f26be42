//! Structural validation before an image reaches the blur detector.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

use crate::error::PipelineError;

/// Cheap checks that catch empty, foreign and header-corrupt files.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate file contents without decoding pixel data.
    ///
    /// Checks:
    /// - File is not empty
    /// - Magic bytes are PNG, JPEG, GIF or BMP
    /// - The image header parses to non-zero dimensions
    pub fn validate(&self, bytes: &[u8], path: &Path) -> Result<ImageFormat, PipelineError> {
        let corrupt = |message: String| PipelineError::Corrupt {
            path: path.to_path_buf(),
            message,
        };

        if bytes.is_empty() {
            return Err(corrupt("empty file".to_string()));
        }

        let format = Self::format_from_magic(bytes)
            .ok_or_else(|| corrupt("Unrecognized image format (invalid magic bytes)".to_string()))?;

        let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
            .into_dimensions()
            .map_err(|e| corrupt(format!("unreadable header: {e}")))?;
        if width == 0 || height == 0 {
            return Err(corrupt(format!("invalid dimensions {width}x{height}")));
        }

        Ok(format)
    }

    /// Read the file and validate it.
    pub fn validate_file(&self, path: &Path) -> Result<(Vec<u8>, ImageFormat), PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Corrupt {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {e}"),
        })?;
        let format = self.validate(&bytes, path)?;
        Ok((bytes, format))
    }

    /// Match the header bytes against the supported formats.
    fn format_from_magic(header: &[u8]) -> Option<ImageFormat> {
        match header {
            // JPEG: FF D8 FF
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            // PNG: 89 50 4E 47 0D 0A 1A 0A
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageFormat::Png),
            // GIF87a / GIF89a
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageFormat::Gif),
            // BMP: BM
            [b'B', b'M', ..] => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}
