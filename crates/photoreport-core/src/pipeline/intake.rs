//! Image intake: structural validation followed by the blur check.

use image::ImageFormat;

use crate::deck::Picture;
use crate::error::PipelineError;
use crate::types::Classification;

use super::blur::{BlurDetector, BlurVerdict};
use super::discovery::ImageCandidate;
use super::validate::Validator;

/// A candidate that passed intake, with the bytes that will be embedded.
#[derive(Debug, Clone)]
pub struct AcceptedImage {
    pub file_name: String,
    pub format: ImageFormat,
    pub verdict: BlurVerdict,
    pub bytes: Vec<u8>,
}

impl AcceptedImage {
    pub fn into_picture(self) -> Picture {
        Picture {
            name: self.file_name,
            format: self.format,
            bytes: self.bytes,
        }
    }
}

/// Decides which candidates may be placed.
#[derive(Debug, Clone, Copy)]
pub struct IntakeFilter {
    validator: Validator,
    detector: BlurDetector,
}

impl IntakeFilter {
    pub fn new(blur_threshold: f64) -> Self {
        Self {
            validator: Validator::new(),
            detector: BlurDetector::new(blur_threshold),
        }
    }

    /// Validate the file, then run the blur detector on the same bytes.
    pub fn classify(&self, candidate: &ImageCandidate) -> Classification {
        match self.admit(candidate) {
            Ok(accepted) => Classification::Valid(accepted),
            Err(err @ PipelineError::DetectorRead { .. }) => {
                Classification::UnreadableByDetector(err)
            }
            Err(err) => Classification::CorruptOrUnreadable(err),
        }
    }

    fn admit(&self, candidate: &ImageCandidate) -> Result<AcceptedImage, PipelineError> {
        let (bytes, format) = self.validator.validate_file(&candidate.path)?;
        let verdict = self.detector.analyze(&bytes, &candidate.path)?;
        tracing::debug!(
            "Accepted {} ({:?}, variance {:.2})",
            candidate.file_name,
            format,
            verdict.variance
        );
        Ok(AcceptedImage {
            file_name: candidate.file_name.clone(),
            format,
            verdict,
            bytes,
        })
    }
}
