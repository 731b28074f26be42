//! Error types for the photo report pipeline.
//!
//! Errors are organized by layer: run-level failures that abort a report
//! ([`ReportError`]), configuration problems caught at load time
//! ([`ConfigError`]), per-file failures that only skip one image
//! ([`PipelineError`]), and slide package failures ([`DeckError`]).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type. Any of these ends the run.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The source folder does not exist
    #[error("Pasta de origem não encontrada: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The template presentation does not exist
    #[error("Ficheiro de template não encontrado: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Opening, filling or saving the slide deck failed
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),

    /// Filesystem failure outside the per-file loop
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report is already being generated
    #[error("A report run is already in progress")]
    RunInProgress,

    /// The background worker panicked or was aborted
    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config file at the expected location
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-file errors. These skip the file and never abort the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Structural validation failed (empty, truncated header, not an image)
    #[error("Corrupt or unreadable image {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    /// The blur detector could not decode the image
    #[error("Blur detector could not read {}: {message}", path.display())]
    DetectorRead { path: PathBuf, message: String },

    /// Inserting the picture into the deck failed
    #[error("Placement failed for {}: {source}", path.display())]
    Placement {
        path: PathBuf,
        #[source]
        source: DeckError,
    },

    /// Moving the source file to the processed folder failed
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading or writing the presentation package.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A part required by the package structure is absent
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// A part exists but does not have the expected shape
    #[error("Malformed part {part}: {message}")]
    MalformedPart { part: String, message: String },

    /// The requested slide layout does not exist in the template
    #[error("Slide layout {index} not found (template has {available})")]
    LayoutOutOfRange { index: usize, available: usize },

    /// The slide has no placeholder of the requested kind
    #[error("Slide {slide} has no {placeholder} placeholder")]
    MissingPlaceholder { slide: usize, placeholder: String },

    /// A slide handle that this deck did not hand out
    #[error("Unknown slide {0}")]
    UnknownSlide(usize),
}

/// Convenience type alias for report results.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Convenience type alias for per-file results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
