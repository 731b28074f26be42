//! Core data types for the photo report pipeline.
//!
//! These types describe what happened to each image and to the run as a
//! whole.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::{PipelineError, ReportError};
use crate::pipeline::AcceptedImage;

/// Intake outcome for one candidate file.
#[derive(Debug)]
pub enum Classification {
    /// Structurally valid and readable by the blur detector. The blur flag
    /// inside the verdict is advisory; blurry images are still placed.
    Valid(AcceptedImage),

    /// Empty, truncated or not an image at all
    CorruptOrUnreadable(PipelineError),

    /// Header parsed but the detector could not decode the pixels
    UnreadableByDetector(PipelineError),
}

impl Classification {
    /// The image to place, or the error that keeps the file in the source
    /// folder.
    pub fn into_accepted(self) -> Result<AcceptedImage, PipelineError> {
        match self {
            Classification::Valid(accepted) => Ok(accepted),
            Classification::CorruptOrUnreadable(err)
            | Classification::UnreadableByDetector(err) => Err(err),
        }
    }
}

/// Why a file was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Corrupt,
    DetectorRead,
    Placement,
    Move,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::Corrupt => "corrupt",
            SkipReason::DetectorRead => "detector-read",
            SkipReason::Placement => "placement",
            SkipReason::Move => "move",
        };
        f.write_str(label)
    }
}

impl From<&PipelineError> for SkipReason {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::Corrupt { .. } => SkipReason::Corrupt,
            PipelineError::DetectorRead { .. } => SkipReason::DetectorRead,
            PipelineError::Placement { .. } => SkipReason::Placement,
            PipelineError::Move { .. } => SkipReason::Move,
        }
    }
}

/// Diagnostic for one skipped file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
    pub message: String,
}

impl SkippedFile {
    pub fn from_error(file_name: impl Into<String>, err: &PipelineError) -> Self {
        Self {
            file_name: file_name.into(),
            reason: SkipReason::from(err),
            message: err.to_string(),
        }
    }

    /// Line shown in the status feed.
    pub fn status_line(&self) -> String {
        match self.reason {
            SkipReason::Corrupt => format!("ERRO: Ficheiro corrompido: {}", self.file_name),
            SkipReason::DetectorRead => {
                format!("ERRO: Não foi possível ler a imagem: {}", self.file_name)
            }
            SkipReason::Placement | SkipReason::Move => {
                format!("ERRO inesperado com: {} ({})", self.file_name, self.message)
            }
        }
    }
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum RunStatus {
    /// The deck was written
    Completed { output: PathBuf },

    /// Nothing to process; no file written
    NoImages,

    /// A fatal error ended the run
    Failed(ReportError),
}

/// Everything a caller learns once a run is over.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub images_placed: usize,
    pub content_slides: usize,
    pub skipped: Vec<SkippedFile>,
}

impl RunOutcome {
    pub fn failed(error: ReportError) -> Self {
        Self {
            status: RunStatus::Failed(error),
            images_placed: 0,
            content_slides: 0,
            skipped: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.status, RunStatus::Failed(_))
    }

    /// Path of the written deck, if any.
    pub fn output(&self) -> Option<&PathBuf> {
        match &self.status {
            RunStatus::Completed { output } => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_skip_reason_from_error() {
        let err = PipelineError::DetectorRead {
            path: PathBuf::from("/in/b.png"),
            message: "truncated".into(),
        };
        let skipped = SkippedFile::from_error("b.png", &err);
        assert_eq!(skipped.reason, SkipReason::DetectorRead);
        assert!(skipped.message.contains("truncated"));
        assert_eq!(
            skipped.status_line(),
            "ERRO: Não foi possível ler a imagem: b.png"
        );
    }

    #[test]
    fn test_move_failure_line_carries_message() {
        let err = PipelineError::Move {
            from: PathBuf::from("/in/a.jpg"),
            to: PathBuf::from("/done/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let line = SkippedFile::from_error("a.jpg", &err).status_line();
        assert!(line.starts_with("ERRO inesperado com: a.jpg"));
        assert!(line.contains("denied"));
    }

    #[test]
    fn test_skipped_file_serializes_reason() {
        let skipped = SkippedFile {
            file_name: "x.gif".into(),
            reason: SkipReason::Corrupt,
            message: "empty".into(),
        };
        let json = serde_json::to_string(&skipped).unwrap();
        assert!(json.contains(r#""reason":"corrupt""#));
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = RunOutcome {
            status: RunStatus::Completed {
                output: PathBuf::from("/out/r.pptx"),
            },
            images_placed: 2,
            content_slides: 1,
            skipped: Vec::new(),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.output().map(|p| p.as_path()), Some(Path::new("/out/r.pptx")));

        let failed = RunOutcome::failed(ReportError::RunInProgress);
        assert!(!failed.is_success());
        assert!(failed.output().is_none());
    }
}
