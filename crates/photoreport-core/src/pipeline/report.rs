//! Report orchestration: intake, layout, file moves and persistence.
//!
//! A run is a linear sequence of stages. Fatal conditions end it at the
//! current stage; per-file failures are recorded and the loop continues.
//! Every run ends with exactly one [`ProgressEvent::Finalized`].
//!
//! [`ProgressEvent::Finalized`]: super::progress::ProgressEvent::Finalized

use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ReportConfig;
use crate::deck::{PptxDeck, SlideDeck};
use crate::error::{DeckError, PipelineError, ReportError};
use crate::layout::{HeaderSlide, SlideLayoutEngine};
use crate::types::{RunOutcome, RunStatus, SkippedFile};

use super::discovery::{FileDiscovery, ImageCandidate};
use super::intake::IntakeFilter;
use super::progress::{percent, ProgressSink};
use super::relocate::move_into;

/// Status line sent when the source folder holds no images.
pub const NO_IMAGES_MESSAGE: &str = "Nenhuma imagem encontrada para processar.";

/// Status line sent after a successful save.
pub const SUCCESS_MESSAGE: &str = "PROCESSO CONCLUÍDO COM SUCESSO!";

const SEPARATOR_WIDTH: usize = 50;

/// Stages of a run, used to label fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingPaths,
    ValidatingInputs,
    OpeningTemplate,
    EmittingHeader,
    ProcessingImages,
    PersistingOutput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingPaths => "resolving paths",
            Stage::ValidatingInputs => "validating inputs",
            Stage::OpeningTemplate => "opening template",
            Stage::EmittingHeader => "emitting header",
            Stage::ProcessingImages => "processing images",
            Stage::PersistingOutput => "persisting output",
        };
        f.write_str(name)
    }
}

struct StageError {
    stage: Stage,
    error: ReportError,
}

impl StageError {
    fn new(stage: Stage, error: impl Into<ReportError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

fn io_at(stage: Stage, path: &Path) -> impl FnOnce(std::io::Error) -> StageError + '_ {
    move |source| {
        StageError::new(
            stage,
            ReportError::Io {
                path: path.to_path_buf(),
                source,
            },
        )
    }
}

/// Counters filled in as the run progresses, kept even when it fails.
#[derive(Default)]
struct RunTally {
    images_placed: usize,
    content_slides: usize,
    skipped: Vec<SkippedFile>,
}

/// Resolved folders for one run.
#[derive(Debug, Clone)]
struct RunPaths {
    source: PathBuf,
    destination: PathBuf,
    processed: PathBuf,
    template: PathBuf,
}

/// Drives one report from the source folder to the saved deck.
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    config: Arc<ReportConfig>,
    discovery: FileDiscovery,
    intake: IntakeFilter,
}

impl ReportPipeline {
    pub fn new(config: Arc<ReportConfig>) -> Self {
        let intake = IntakeFilter::new(config.settings.blur_threshold);
        Self {
            config,
            discovery: FileDiscovery::new(),
            intake,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run to completion, reporting to `sink`.
    ///
    /// A non-empty `source_override` replaces the configured source folder.
    pub fn run(&self, source_override: Option<&Path>, sink: &ProgressSink) -> RunOutcome {
        let mut tally = RunTally::default();
        let status = match self.execute(source_override, sink, &mut tally) {
            Ok(status) => status,
            Err(StageError { stage, error }) => {
                match &error {
                    ReportError::SourceNotFound(_) | ReportError::TemplateNotFound(_) => {
                        tracing::error!("{}", error);
                        sink.status(format!("ERRO: {error}"));
                    }
                    _ => {
                        tracing::error!(stage = %stage, "Critical error while {}: {}", stage, error);
                        sink.status(format!("ERRO CRÍTICO: {error}"));
                    }
                }
                RunStatus::Failed(error)
            }
        };
        sink.finalized();

        RunOutcome {
            status,
            images_placed: tally.images_placed,
            content_slides: tally.content_slides,
            skipped: tally.skipped,
        }
    }

    fn execute(
        &self,
        source_override: Option<&Path>,
        sink: &ProgressSink,
        tally: &mut RunTally,
    ) -> Result<RunStatus, StageError> {
        let settings = &self.config.settings;

        tracing::debug!("Stage: {}", Stage::ResolvingPaths);
        let paths = self.resolve_paths(source_override);

        tracing::debug!("Stage: {}", Stage::ValidatingInputs);
        if !paths.source.is_dir() {
            return Err(StageError::new(
                Stage::ValidatingInputs,
                ReportError::SourceNotFound(paths.source),
            ));
        }
        if !paths.template.is_file() {
            return Err(StageError::new(
                Stage::ValidatingInputs,
                ReportError::TemplateNotFound(paths.template),
            ));
        }

        tracing::debug!("Stage: {}", Stage::OpeningTemplate);
        let mut deck = PptxDeck::open(&paths.template)
            .map_err(|e| StageError::new(Stage::OpeningTemplate, e))?;
        let available = deck.layout_count();
        for index in [settings.header_layout, settings.content_layout] {
            if index >= available {
                return Err(StageError::new(
                    Stage::OpeningTemplate,
                    DeckError::LayoutOutOfRange { index, available },
                ));
            }
        }

        tracing::debug!("Stage: {}", Stage::EmittingHeader);
        let header = HeaderSlide::new(
            self.config.folders.unit.as_str(),
            self.config.folders.address.as_str(),
            Local::now().date_naive(),
        );
        header
            .emit(&mut deck, settings.header_layout)
            .map_err(|e| StageError::new(Stage::EmittingHeader, e))?;

        tracing::debug!("Stage: {}", Stage::ProcessingImages);
        let candidates = self
            .discovery
            .discover(&paths.source)
            .map_err(io_at(Stage::ProcessingImages, &paths.source))?;
        if candidates.is_empty() {
            tracing::info!("No images found in {:?}", paths.source);
            sink.status(NO_IMAGES_MESSAGE);
            return Ok(RunStatus::NoImages);
        }

        std::fs::create_dir_all(&paths.processed)
            .map_err(io_at(Stage::ProcessingImages, &paths.processed))?;

        tracing::info!(
            "Processing {} image(s) from {:?}",
            candidates.len(),
            paths.source
        );
        self.process_images(&candidates, &mut deck, &paths.processed, sink, tally);

        tracing::debug!("Stage: {}", Stage::PersistingOutput);
        std::fs::create_dir_all(&paths.destination)
            .map_err(io_at(Stage::PersistingOutput, &paths.destination))?;
        let output = paths.destination.join(output_file_name());
        deck.save(&output)
            .map_err(|e| StageError::new(Stage::PersistingOutput, e))?;

        tracing::info!(
            "Report saved as {:?} ({} image(s), {} content slide(s), {} skipped)",
            output,
            tally.images_placed,
            tally.content_slides,
            tally.skipped.len()
        );
        sink.status("-".repeat(SEPARATOR_WIDTH));
        sink.status(SUCCESS_MESSAGE);
        sink.status(format!("Relatório salvo em: {}", output.display()));
        if !tally.skipped.is_empty() {
            sink.status(format!("{} ficheiro(s) ignorado(s).", tally.skipped.len()));
        }

        Ok(RunStatus::Completed { output })
    }

    fn resolve_paths(&self, source_override: Option<&Path>) -> RunPaths {
        let source = match source_override {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => self.config.source_dir(),
        };
        RunPaths {
            source,
            destination: self.config.destination_dir(),
            processed: self.config.processed_dir(),
            template: self.config.template_path(),
        }
    }

    /// The per-file loop. Failures are recorded in `tally` and never stop it.
    fn process_images<D>(
        &self,
        candidates: &[ImageCandidate],
        deck: &mut D,
        processed: &Path,
        sink: &ProgressSink,
        tally: &mut RunTally,
    ) where
        D: SlideDeck + ?Sized,
    {
        let mut engine = SlideLayoutEngine::from_settings(&self.config.settings);
        let total = candidates.len();

        for (i, candidate) in candidates.iter().enumerate() {
            sink.status(format!(
                "Processando {}/{}: {}",
                i + 1,
                total,
                candidate.file_name
            ));

            if let Err(err) = self.process_candidate(candidate, &mut engine, &mut *deck, processed) {
                tracing::warn!("Skipping {}: {}", candidate.file_name, err);
                let skipped = SkippedFile::from_error(candidate.file_name.as_str(), &err);
                sink.status(skipped.status_line());
                tally.skipped.push(skipped);
            }

            tally.images_placed = engine.images_placed();
            tally.content_slides = engine.slides_created();
            sink.progress(percent(i + 1, total));
        }
    }

    /// Intake, placement and move for one file.
    fn process_candidate<D>(
        &self,
        candidate: &ImageCandidate,
        engine: &mut SlideLayoutEngine,
        deck: &mut D,
        processed: &Path,
    ) -> Result<(), PipelineError>
    where
        D: SlideDeck + ?Sized,
    {
        let accepted = self.intake.classify(candidate).into_accepted()?;
        if accepted.verdict.blurry {
            tracing::info!("Placing {} despite blur flag", candidate.file_name);
        }

        let placement = engine
            .place(deck, accepted.into_picture())
            .map_err(|source| PipelineError::Placement {
                path: candidate.path.clone(),
                source,
            })?;
        tracing::info!(
            "Image '{}' added to slide {} (slot {})",
            candidate.file_name,
            placement.slide.index(),
            placement.slot
        );

        move_into(&candidate.path, processed)?;
        Ok(())
    }
}

/// `Relatorio_Fotografico_<YYYY-MM-DD_HHMMSS>.pptx`, local time.
pub fn output_file_name() -> String {
    format!(
        "Relatorio_Fotografico_{}.pptx",
        Local::now().format("%Y-%m-%d_%H%M%S")
    )
}
