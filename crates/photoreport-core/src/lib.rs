//! Photoreport Core - photo report generation library.
//!
//! Turns a folder of photographs into a slide deck built from a template:
//! a header slide with site details, then the photographs laid out in a
//! fixed grid. Corrupt files are skipped and left in place, blurry ones are
//! flagged in the log, placed ones are moved to a processed folder.
//!
//! # Architecture
//!
//! ```text
//! Discover → Validate → Blur check → Layout → Move → Save deck
//!                         progress events ↘ observer
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use photoreport_core::{ReportConfig, ReportRunner};
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> photoreport_core::Result<()> {
//!     let config = Arc::new(ReportConfig::load()?);
//!     let runner = ReportRunner::new(config);
//!
//!     let outcome = runner
//!         .start(None)?
//!         .watch(Duration::from_millis(100), |event| println!("{event}"))
//!         .await;
//!     println!("Placed {} image(s)", outcome.images_placed);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod deck;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::ReportConfig;
pub use deck::{PptxDeck, SlideDeck};
pub use error::{ConfigError, DeckError, PipelineError, PipelineResult, ReportError, Result};
pub use layout::{HeaderSlide, SlideLayoutEngine};
pub use pipeline::{ProgressEvent, ReportPipeline, ReportRunner, RunHandle};
pub use types::{Classification, RunOutcome, RunStatus, SkipReason, SkippedFile};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
