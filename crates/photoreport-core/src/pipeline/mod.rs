//! Photo report pipeline components.
//!
//! This module contains all the stages of a report run:
//! - **discovery**: Find image files in the source folder
//! - **validate**: Structural checks before decoding
//! - **blur**: Laplacian variance blur detection
//! - **intake**: Validation plus blur check per candidate
//! - **relocate**: Move placed files to the processed folder
//! - **progress**: Event channel towards the observer
//! - **report**: Orchestrates the full run
//! - **runner**: Background worker with a single-run guard

pub mod blur;
pub mod discovery;
pub mod intake;
pub mod progress;
pub mod relocate;
pub mod report;
pub mod runner;
pub mod validate;

// Re-exports for convenient access
pub use blur::{bt601_gray, laplacian_variance, BlurDetector, BlurVerdict};
pub use discovery::{FileDiscovery, ImageCandidate, SUPPORTED_SUFFIXES};
pub use intake::{AcceptedImage, IntakeFilter};
pub use progress::{progress_channel, ProgressEvent, ProgressSink};
pub use report::{ReportPipeline, Stage};
pub use runner::{ReportRunner, RunHandle, RunPermit, RunSlot};
pub use validate::Validator;
