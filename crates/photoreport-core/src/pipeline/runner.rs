//! Background execution of report runs.
//!
//! [`ReportRunner::start`] moves the pipeline onto a blocking worker and
//! hands back a [`RunHandle`] the caller polls for progress. Only one run may
//! be live at a time.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::types::RunOutcome;

use super::progress::{progress_channel, ProgressEvent};
use super::report::ReportPipeline;

/// Single-occupancy flag guarding report runs.
#[derive(Debug, Clone, Default)]
pub struct RunSlot {
    busy: Arc<AtomicBool>,
}

impl RunSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or fail if a run already holds it.
    pub fn try_acquire(&self) -> Result<RunPermit, ReportError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReportError::RunInProgress)?;
        Ok(RunPermit {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the slot when dropped, including on panic.
#[derive(Debug)]
pub struct RunPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Starts report runs on a blocking worker.
#[derive(Debug, Clone)]
pub struct ReportRunner {
    pipeline: Arc<ReportPipeline>,
    slot: RunSlot,
}

impl ReportRunner {
    pub fn new(config: Arc<ReportConfig>) -> Self {
        Self {
            pipeline: Arc::new(ReportPipeline::new(config)),
            slot: RunSlot::new(),
        }
    }

    /// Start a run. Must be called inside a Tokio runtime.
    pub fn start(&self, source_override: Option<PathBuf>) -> Result<RunHandle, ReportError> {
        let permit = self.slot.try_acquire()?;
        let (sink, events) = progress_channel();
        let pipeline = Arc::clone(&self.pipeline);

        tracing::debug!("Starting report worker");
        let worker = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline.run(source_override.as_deref(), &sink)
        });

        Ok(RunHandle {
            events,
            worker,
            finalized: false,
        })
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn config(&self) -> &ReportConfig {
        self.pipeline.config()
    }
}

/// Observer side of a live run.
#[derive(Debug)]
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<ProgressEvent>,
    worker: JoinHandle<RunOutcome>,
    finalized: bool,
}

impl RunHandle {
    /// Drain every event queued so far without waiting.
    pub fn poll(&mut self) -> Vec<ProgressEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if event == ProgressEvent::Finalized {
                self.finalized = true;
            }
            drained.push(event);
        }
        drained
    }

    /// Whether the worker is still running.
    pub fn is_alive(&self) -> bool {
        !self.worker.is_finished()
    }

    /// Poll at a fixed interval until the sentinel arrives or the worker is
    /// gone, then return the run's outcome.
    pub async fn watch<F>(mut self, interval: Duration, mut on_event: F) -> RunOutcome
    where
        F: FnMut(&ProgressEvent),
    {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            for event in self.poll() {
                on_event(&event);
            }
            if self.finalized || !self.is_alive() {
                break;
            }
        }

        let outcome = match (&mut self.worker).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Report worker failed: {}", e);
                RunOutcome::failed(ReportError::Worker(e.to_string()))
            }
        };
        // Anything sent between the last poll and the worker's exit.
        for event in self.poll() {
            on_event(&event);
        }
        outcome
    }
}
