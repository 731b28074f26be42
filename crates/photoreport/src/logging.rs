//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats, plus an optional plain-text
//! log file.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use photoreport_core::config::LoggingConfig;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Plain-text layer appending to the log file.
type FileLayer<S> = fmt::Layer<S, DefaultFields, Format, Mutex<File>>;

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `level` - Default level when RUST_LOG is not set.
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
/// * `log_file` - Append every event to this file as well, without colours.
///
/// # Notes
///
/// - Log output goes to stderr (stdout is reserved for command output)
/// - The RUST_LOG environment variable can override the log level
/// - Fails if a global subscriber is already installed
pub fn init(level: &str, json_format: bool, log_file: Option<&Path>) -> Result<(), TryInitError> {
    // Build the filter, respecting RUST_LOG if set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let file = log_file.and_then(open_log_file);

    if json_format {
        // JSON format for machine parsing
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(file_layer(file))
            .try_init()
    } else {
        // Pretty format for humans
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .with(file_layer(file))
            .try_init()
    }
}

/// Initialize logging from the `[logging]` section, with CLI overrides.
///
/// `log_file` is the already resolved path, see `ReportConfig::log_file`.
pub fn init_from_config(
    config: &LoggingConfig,
    log_file: Option<&Path>,
    verbose_override: bool,
    json_logs_override: bool,
) -> Result<(), TryInitError> {
    let level = if verbose_override && !matches!(config.level.as_str(), "debug" | "trace") {
        "debug"
    } else {
        config.level.as_str()
    };
    let json_format = json_logs_override || config.format == "json";
    init(level, json_format, log_file)
}

fn file_layer<S>(file: Option<File>) -> Option<FileLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    })
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: cannot create log folder {}: {e}", parent.display());
            return None;
        }
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", path.display());
            None
        }
    }
}
