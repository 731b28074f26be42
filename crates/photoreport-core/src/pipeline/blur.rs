//! Blur detection from the variance of the Laplacian.

use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Luma};
use std::io::Cursor;
use std::path::Path;

use crate::error::PipelineError;

/// Sharpness measurement for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurVerdict {
    pub variance: f64,
    pub blurry: bool,
    pub format: ImageFormat,
}

/// Flags images whose Laplacian variance is below a threshold.
#[derive(Debug, Clone, Copy)]
pub struct BlurDetector {
    threshold: f64,
}

impl BlurDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Decode the image bytes and measure sharpness.
    ///
    /// Any decode failure (empty input, unknown format, truncated pixel data)
    /// is a [`PipelineError::DetectorRead`], never a verdict.
    pub fn analyze(&self, bytes: &[u8], path: &Path) -> Result<BlurVerdict, PipelineError> {
        let detector_error = |message: String| PipelineError::DetectorRead {
            path: path.to_path_buf(),
            message,
        };

        if bytes.is_empty() {
            return Err(detector_error("empty file".to_string()));
        }

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| detector_error(format!("cannot detect format: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| detector_error("unsupported image format".to_string()))?;
        let image = reader.decode().map_err(|e| detector_error(e.to_string()))?;

        let variance = laplacian_variance(&bt601_gray(&image));
        let blurry = variance < self.threshold;
        if blurry {
            tracing::warn!(
                "Possibly blurry image: {} (variance {:.2})",
                path.file_name().unwrap_or_default().to_string_lossy(),
                variance
            );
        }

        Ok(BlurVerdict {
            variance,
            blurry,
            format,
        })
    }
}

/// 8-bit grayscale with BT.601 weights (0.299 R + 0.587 G + 0.114 B),
/// rounded to nearest. Alpha is dropped, not composited.
pub fn bt601_gray(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
        Luma([((weighted + 500) / 1000) as u8])
    })
}

/// Population variance of the 4-neighbour Laplacian over every pixel.
///
/// Borders use reflect-101 (`dcb|abcd|cba`). A one-pixel axis reflects onto
/// itself.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let w = width as i64;
    let h = height as i64;
    let pixel = |x: i64, y: i64| f64::from(gray.get_pixel(reflect(x, w), reflect(y, h))[0]);

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 0..h {
        for x in 0..w {
            let response = pixel(x, y - 1) + pixel(x - 1, y) + pixel(x + 1, y) + pixel(x, y + 1)
                - 4.0 * pixel(x, y);
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = (w * h) as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

fn reflect(i: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let i = if i < 0 {
        -i
    } else if i >= len {
        2 * len - 2 - i
    } else {
        i
    };
    i as u32
}
