//! Progress events sent from the pipeline to an observer.
//!
//! The channel is unbounded: sending never blocks the worker, and a dropped
//! receiver never fails the run.

use std::fmt;
use tokio::sync::mpsc;

/// Wire form of the completion sentinel.
pub const FINALIZED: &str = "FINALIZADO";

/// Prefix of progress lines.
pub const PROGRESS_PREFIX: &str = "PROGRESSO:";

/// One message for the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Percent of candidates attempted (0-100)
    Progress(u8),
    /// Human-readable status or error line
    Status(String),
    /// The run is over; nothing follows
    Finalized,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Progress(percent) => write!(f, "{PROGRESS_PREFIX}{percent}"),
            ProgressEvent::Status(text) => f.write_str(text),
            ProgressEvent::Finalized => f.write_str(FINALIZED),
        }
    }
}

/// Sending half held by the pipeline.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSink {
    pub fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Progress receiver dropped; event discarded");
        }
    }

    pub fn status(&self, text: impl Into<String>) {
        self.send(ProgressEvent::Status(text.into()));
    }

    pub fn progress(&self, percent: u8) {
        self.send(ProgressEvent::Progress(percent.min(100)));
    }

    pub fn finalized(&self) {
        self.send(ProgressEvent::Finalized);
    }
}

/// Create a connected sink and receiver.
pub fn progress_channel() -> (ProgressSink, mpsc::UnboundedReceiver<ProgressEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSink { tx }, rx)
}

/// `floor(attempted * 100 / total)`, clamped to 100.
pub fn percent(attempted: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (attempted.min(total) * 100 / total) as u8
}
