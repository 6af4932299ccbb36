//! Export orchestration.
//!
//! [`IconExportPipeline`] turns one [`ExportRequest`] into a PNG per catalog
//! entry. Work happens in three steps:
//!
//! 1. An [`ExportPlan`] pairs every catalog entry of the enabled platforms
//!    with its target path.
//! 2. All platform directories are created before any job is dispatched.
//! 3. Jobs run on a rayon pool, each one rasterizing and writing a single
//!    file. A failed job is recorded and never affects its siblings.
//!
//! `export` returns only once every job has either written its file or
//! failed, so the [`ExportOutcome`] always reflects the final state on disk.

use std::any::Any;
use std::error::Error as _;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::catalog::{self, Platform, SizeSpec};
use crate::error::{ConfigError, InputError, JobError};
use crate::events::{ExportEvent, ExportEvents, SubscriptionId};
use crate::layout::{self, DirectoryLayout};
use crate::options::ExportOptions;
use crate::raster::{Rasterizer, ResvgRasterizer};
use crate::source::VectorSource;
use crate::writer::OutputWriter;

/// File name stem used when the caller does not pick one.
pub const DEFAULT_FILE_STEM: &str = "icon";

// ============================================================================
// ExportRequest
// ============================================================================

/// Everything one export needs: the parsed source, where to write, and the
/// base file name.
#[derive(Debug)]
pub struct ExportRequest {
    source: VectorSource,
    destination: PathBuf,
    file_stem: String,
}

impl ExportRequest {
    /// Creates a request using [`DEFAULT_FILE_STEM`].
    pub fn new(source: VectorSource, destination: impl Into<PathBuf>) -> Self {
        Self {
            source,
            destination: destination.into(),
            file_stem: DEFAULT_FILE_STEM.to_string(),
        }
    }

    /// Sets the base file name.
    ///
    /// The stem must be a plain file name: not empty, no path separators.
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Result<Self, InputError> {
        let stem = stem.into();
        validate_file_stem(&stem)?;
        self.file_stem = stem;
        Ok(self)
    }

    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }
}

fn validate_file_stem(stem: &str) -> Result<(), InputError> {
    let invalid = stem.trim().is_empty()
        || stem == "."
        || stem == ".."
        || stem.contains(['/', '\\'])
        || stem.contains('\0');
    if invalid {
        return Err(InputError::InvalidFileStem(stem.to_string()));
    }
    Ok(())
}

// ============================================================================
// ExportPlan
// ============================================================================

/// A single rasterize-and-write unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub spec: SizeSpec,
    pub directory: PathBuf,
    /// File name without the `.png` extension.
    pub file_stem: String,
}

impl ExportJob {
    /// The full path of the PNG this job writes.
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.png", self.file_stem))
    }
}

/// All jobs of one export, built before any work starts.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    layout: DirectoryLayout,
    platforms: Vec<Platform>,
    jobs: Vec<ExportJob>,
}

impl ExportPlan {
    pub fn new(destination: impl Into<PathBuf>, file_stem: &str, platforms: &[Platform]) -> Self {
        let layout = DirectoryLayout::new(destination);
        let jobs = platforms
            .iter()
            .flat_map(|platform| catalog::catalog(*platform))
            .map(|spec| ExportJob {
                spec: *spec,
                directory: layout.directory_for(spec),
                file_stem: layout::file_stem_for(spec, file_stem),
            })
            .collect();

        Self {
            layout,
            platforms: platforms.to_vec(),
            jobs,
        }
    }

    pub fn layout(&self) -> &DirectoryLayout {
        &self.layout
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn jobs(&self) -> &[ExportJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Shared flag that stops an export from starting further jobs.
///
/// Jobs already rendering run to completion; jobs that have not started yet
/// fail with [`JobError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// ExportOutcome
// ============================================================================

/// Aggregate result classification of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportStatus {
    /// Every job wrote its file.
    Success,
    /// Some jobs failed, at least one file was written.
    PartialFailure,
    /// No file was written.
    Failed,
    /// The export was cancelled before all jobs started.
    Cancelled,
}

/// A job that did not produce its file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFailure {
    pub spec: SizeSpec,
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_error")]
    pub error: JobError,
}

impl ExportFailure {
    /// The error with its full chain of causes, separated by `: `.
    pub fn message(&self) -> String {
        error_chain(&self.error)
    }
}

fn error_chain(error: &JobError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn serialize_error<S: Serializer>(error: &JobError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&error_chain(error))
}

/// The result of one export run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub destination: PathBuf,
    pub status: ExportStatus,
    pub attempted: usize,
    pub succeeded: usize,
    pub written: Vec<PathBuf>,
    pub failures: Vec<ExportFailure>,
}

impl ExportOutcome {
    fn new(destination: PathBuf, written: Vec<PathBuf>, failures: Vec<ExportFailure>) -> Self {
        let attempted = written.len() + failures.len();
        let succeeded = written.len();
        let status = if failures.iter().any(|f| f.error.is_cancelled()) {
            ExportStatus::Cancelled
        } else if failures.is_empty() {
            ExportStatus::Success
        } else if succeeded == 0 {
            ExportStatus::Failed
        } else {
            ExportStatus::PartialFailure
        };

        Self {
            destination,
            status,
            attempted,
            succeeded,
            written,
            failures,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.status == ExportStatus::Success
    }

    /// Number of jobs that were skipped because of cancellation.
    pub fn cancelled(&self) -> usize {
        self.failures.iter().filter(|f| f.error.is_cancelled()).count()
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        match self.status {
            ExportStatus::Success => format!(
                "{} icons were saved at {}",
                self.succeeded,
                self.destination.display()
            ),
            ExportStatus::Cancelled => format!(
                "export cancelled: {} of {} icons saved at {}",
                self.succeeded,
                self.attempted,
                self.destination.display()
            ),
            ExportStatus::PartialFailure | ExportStatus::Failed => format!(
                "{} of {} icons saved at {}, {} failed",
                self.succeeded,
                self.attempted,
                self.destination.display(),
                self.failed()
            ),
        }
    }

    /// Serializes the outcome to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// IconExportPipeline
// ============================================================================

/// Renders the full icon catalog for a vector source.
pub struct IconExportPipeline<R = ResvgRasterizer> {
    rasterizer: R,
    writer: OutputWriter,
    platforms: Vec<Platform>,
    pool: Option<rayon::ThreadPool>,
    events: ExportEvents,
}

impl IconExportPipeline<ResvgRasterizer> {
    /// Creates a pipeline with default options on rayon's global pool.
    pub fn new() -> Self {
        let options = ExportOptions::default();
        Self {
            rasterizer: ResvgRasterizer::new(options.scale_mode),
            writer: OutputWriter::new(options.compression),
            platforms: options.enabled_platforms(),
            pool: None,
            events: ExportEvents::new(),
        }
    }

    pub fn from_options(options: &ExportOptions) -> Result<Self, ConfigError> {
        Self::with_rasterizer(ResvgRasterizer::new(options.scale_mode), options)
    }
}

impl Default for IconExportPipeline<ResvgRasterizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rasterizer> IconExportPipeline<R> {
    /// Creates a pipeline around a custom rasterizer.
    ///
    /// `options.scale_mode` only applies to [`ResvgRasterizer`]; other
    /// rasterizers carry their own settings.
    pub fn with_rasterizer(rasterizer: R, options: &ExportOptions) -> Result<Self, ConfigError> {
        let platforms = options.enabled_platforms();
        if platforms.is_empty() {
            return Err(ConfigError::NoPlatforms);
        }

        let pool = match options.threads {
            Some(0) => return Err(ConfigError::ZeroThreads),
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("appicon-worker-{i}"))
                    .build()?,
            ),
            None => None,
        };

        Ok(Self {
            rasterizer,
            writer: OutputWriter::new(options.compression),
            platforms,
            pool,
            events: ExportEvents::new(),
        })
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn events(&self) -> &ExportEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut ExportEvents {
        &mut self.events
    }

    /// Shorthand for `events_mut().subscribe(..)`.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ExportEvent<'_>) + Send + Sync + 'static,
    {
        self.events.subscribe(callback)
    }

    /// Builds the plan this pipeline would execute for `request`.
    pub fn plan(&self, request: &ExportRequest) -> ExportPlan {
        ExportPlan::new(request.destination(), request.file_stem(), &self.platforms)
    }

    /// Opens an SVG file and exports it.
    ///
    /// Input errors are returned before anything is created under
    /// `destination`.
    pub fn export_file(
        &self,
        path: impl AsRef<Path>,
        destination: impl Into<PathBuf>,
        file_stem: &str,
    ) -> Result<ExportOutcome, InputError> {
        let source = VectorSource::open(path)?;
        let request = ExportRequest::new(source, destination).with_file_stem(file_stem)?;
        Ok(self.export(&request))
    }

    /// Runs the export to completion.
    pub fn export(&self, request: &ExportRequest) -> ExportOutcome {
        self.export_with_cancel(request, &CancellationToken::new())
    }

    /// Runs the export, skipping jobs that have not started once `cancel`
    /// is triggered.
    pub fn export_with_cancel(
        &self,
        request: &ExportRequest,
        cancel: &CancellationToken,
    ) -> ExportOutcome {
        let plan = self.plan(request);
        log::info!(
            "exporting {} icons for {:?} to {}",
            plan.len(),
            plan.platforms(),
            request.destination().display()
        );

        for platform in plan.platforms() {
            if let Err(err) = plan.layout().create(*platform) {
                // Jobs retry creation on write and fail individually
                log::warn!("failed to create {platform} directories: {err}");
            }
        }

        self.events.emit(&ExportEvent::Started {
            total: plan.len(),
            destination: request.destination(),
        });

        let run = || -> Vec<Result<PathBuf, JobError>> {
            plan.jobs()
                .par_iter()
                .map(|job| self.run_job(request.source(), job, cancel))
                .collect()
        };
        let results = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut written = Vec::new();
        let mut failures = Vec::new();
        for (job, result) in plan.jobs().iter().zip(results) {
            match result {
                Ok(path) => written.push(path),
                Err(error) => failures.push(ExportFailure {
                    spec: job.spec,
                    path: job.path(),
                    error,
                }),
            }
        }

        let outcome = ExportOutcome::new(request.destination().to_path_buf(), written, failures);
        log::info!("{}", outcome.summary());
        self.events.emit(&ExportEvent::Finished { outcome: &outcome });
        outcome
    }

    fn run_job(
        &self,
        source: &VectorSource,
        job: &ExportJob,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, JobError> {
        let result = if cancel.is_cancelled() {
            Err(JobError::Cancelled)
        } else {
            // A panicking renderer must not take the sibling jobs down with it
            panic::catch_unwind(AssertUnwindSafe(|| self.rasterize_and_write(source, job)))
                .unwrap_or_else(|payload| Err(JobError::Panicked(panic_message(payload.as_ref()))))
        };

        match &result {
            Ok(path) => {
                log::debug!("wrote {} to {}", job.spec, path.display());
                self.events.emit(&ExportEvent::JobCompleted {
                    spec: &job.spec,
                    path,
                });
            }
            Err(error) => {
                log::warn!("{} failed: {error}", job.spec);
                self.events.emit(&ExportEvent::JobFailed {
                    spec: &job.spec,
                    error,
                });
            }
        }

        result
    }

    fn rasterize_and_write(&self, source: &VectorSource, job: &ExportJob) -> Result<PathBuf, JobError> {
        let raster = self.rasterizer.rasterize(source, &job.spec)?;
        let path = self.writer.write(&raster, &job.directory, &job.file_stem)?;
        Ok(path)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl<R> std::fmt::Debug for IconExportPipeline<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconExportPipeline")
            .field("writer", &self.writer)
            .field("platforms", &self.platforms)
            .field("threads", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
