//! The `photoreport generate` command.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use photoreport_core::{ProgressEvent, ReportConfig, ReportRunner, RunOutcome, RunStatus};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source folder for this run (overrides folders.pasta_origem)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Interval between progress polls, in milliseconds
    #[arg(long, default_value = "100")]
    pub poll_interval_ms: u64,
}

/// Execute the generate command.
pub async fn execute(args: GenerateArgs, config: ReportConfig) -> anyhow::Result<()> {
    let runner = ReportRunner::new(Arc::new(config));
    let handle = runner.start(args.source)?;

    let progress = create_progress_bar();
    let interval = Duration::from_millis(args.poll_interval_ms.max(1));
    let outcome = handle
        .watch(interval, |event| render_event(&progress, event))
        .await;
    if !progress.is_finished() {
        progress.finish_and_clear();
    }

    print_summary(&outcome);
    match outcome.status {
        RunStatus::Failed(e) => Err(anyhow::Error::new(e).context("Report generation failed")),
        RunStatus::Completed { .. } | RunStatus::NoImages => Ok(()),
    }
}

fn render_event(progress: &ProgressBar, event: &ProgressEvent) {
    match event {
        ProgressEvent::Progress(percent) => progress.set_position(u64::from(*percent)),
        ProgressEvent::Status(line) => {
            if let Some(name) = line.strip_prefix("Processando ") {
                progress.set_message(name.to_string());
            } else {
                progress.println(line);
            }
        }
        ProgressEvent::Finalized => progress.finish_and_clear(),
    }
}

/// Create a percent progress bar for a report run.
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a short summary after the run.
fn print_summary(outcome: &RunOutcome) {
    if let RunStatus::Completed { output } = &outcome.status {
        println!();
        println!("  Report:         {}", output.display());
        println!("  Images placed:  {}", outcome.images_placed);
        println!("  Content slides: {}", outcome.content_slides);
    }
    if !outcome.skipped.is_empty() {
        println!("  Skipped:        {}", outcome.skipped.len());
        for skipped in &outcome.skipped {
            println!("    {} [{}] {}", skipped.file_name, skipped.reason, skipped.message);
        }
    }
}
