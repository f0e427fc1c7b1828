//! Tick-driven batch import job
//!
//! The job never blocks. A host pumps [`TickKind`] events into
//! [`BatchImportJob::handle_tick`]; each tick on the job's own timer converts at
//! most one file, so a single-threaded event loop stays responsive for the
//! whole batch.
//!
//! ```text
//! Validating -> Scanning -> Processing -> Saving -> Done
//!      |            |            |           |
//!      +-> Aborted <+            +-> Cancelled  +-> Aborted (save failed)
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::error::{ImportError, ItemFailure};
use super::progress::ProgressSink;
use super::scan::scan;
use super::step::{convert_one, file_stem, BrushRecord};
use super::summary::{ImportOutcome, ImportSummary};
use crate::app_meta::LIBRARY_EXTENSION;
use crate::assets::AssetHost;
use crate::config::ImportSettings;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies the timer a job listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        TimerId(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Events a host may deliver. Only the job's own timer advances it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Timer(TimerId),
    Redraw,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Validating,
    Scanning,
    Processing,
    Saving,
    Done,
    Aborted,
    Cancelled,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobPhase::Done | JobPhase::Aborted | JobPhase::Cancelled
        )
    }
}

/// The two paths a batch import needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub image_folder: PathBuf,
    pub output_path: PathBuf,
}

impl JobRequest {
    pub fn new(image_folder: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            image_folder: image_folder.into(),
            output_path: output_path.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        if !self.image_folder.is_dir() {
            return Err(ImportError::InvalidPath(format!(
                "image folder {} is not a directory",
                self.image_folder.display()
            )));
        }

        let Some(output_dir) = output_parent(&self.output_path) else {
            return Err(ImportError::InvalidPath(format!(
                "output path {} has no folder",
                self.output_path.display()
            )));
        };
        if !output_dir.is_dir() {
            return Err(ImportError::InvalidPath(format!(
                "output folder {} does not exist",
                output_dir.display()
            )));
        }

        Ok(())
    }

    /// Output path with the library extension guaranteed
    pub fn library_path(&self) -> PathBuf {
        normalize_library_path(&self.output_path)
    }
}

/// Append the library extension unless the path already ends with it
/// (case-insensitive).
pub fn normalize_library_path(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LIBRARY_EXTENSION));

    if has_extension {
        return path.to_path_buf();
    }

    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(LIBRARY_EXTENSION);
    PathBuf::from(raw)
}

/// Folder the library will be written into. A bare file name has none.
fn output_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}

/// Mutable progress of one job. Owned by the job, never shared.
#[derive(Debug, Default)]
pub struct JobState {
    pub cursor: usize,
    pub produced_records: Vec<BrushRecord>,
    /// Seeded once from the host's brush names when scanning finishes
    pub reserved_names: HashSet<String>,
    pub failures: Vec<ItemFailure>,
    pub completed: bool,
}

/// A batch import in flight, borrowing its host for its whole lifetime
pub struct BatchImportJob<'h, H: AssetHost, P: ProgressSink> {
    request: JobRequest,
    host: &'h mut H,
    progress: P,
    progress_active: bool,
    settings: ImportSettings,
    files: Vec<String>,
    state: JobState,
    phase: JobPhase,
    timer: Option<TimerId>,
    error: Option<ImportError>,
    saved_path: Option<PathBuf>,
}

impl<'h, H: AssetHost, P: ProgressSink> BatchImportJob<'h, H, P> {
    /// Validate and scan synchronously.
    ///
    /// Returns a job in `Processing` with its timer registered, or an `Aborted`
    /// job that touched nothing.
    pub fn submit(
        request: JobRequest,
        host: &'h mut H,
        progress: P,
        settings: ImportSettings,
    ) -> Self {
        let mut job = Self {
            request,
            host,
            progress,
            progress_active: false,
            settings,
            files: Vec::new(),
            state: JobState::default(),
            phase: JobPhase::Validating,
            timer: None,
            error: None,
            saved_path: None,
        };

        tracing::info!(
            "Batch import requested: {:?} -> {:?}",
            job.request.image_folder,
            job.request.output_path
        );

        if let Err(err) = job.request.validate() {
            job.abort(err);
            return job;
        }

        job.transition(JobPhase::Scanning);
        let files = match scan(&job.request.image_folder) {
            Ok(files) => files,
            Err(err) => {
                job.abort(ImportError::InvalidPath(err.to_string()));
                return job;
            }
        };

        if files.is_empty() {
            let folder = job.request.image_folder.display().to_string();
            job.abort(ImportError::NoEligibleFiles(folder));
            return job;
        }

        job.state.reserved_names = job.host.brush_names();
        job.state.cursor = 0;
        job.files = files;

        job.progress.begin(job.files.len());
        job.progress_active = true;
        job.timer = Some(TimerId::next());
        job.transition(JobPhase::Processing);

        tracing::info!(
            "Converting {} images ({} brush names already in use)",
            job.files.len(),
            job.state.reserved_names.len()
        );
        job
    }

    /// Advance by at most one unit of work. Foreign events are ignored.
    pub fn handle_tick(&mut self, tick: TickKind) -> JobPhase {
        let own_timer = matches!(tick, TickKind::Timer(id) if Some(id) == self.timer);
        if !own_timer {
            return self.phase;
        }

        match self.phase {
            JobPhase::Processing => self.process_next(),
            JobPhase::Saving => self.save(),
            _ => {}
        }
        self.phase
    }

    /// Stop between ticks. Brushes already created stay in the host; nothing is
    /// saved. Returns false if the job had already finished.
    pub fn cancel(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }

        tracing::warn!(
            "Batch import cancelled after {} of {} files",
            self.state.cursor,
            self.files.len()
        );
        self.finish(JobPhase::Cancelled);
        true
    }

    fn process_next(&mut self) {
        let total = self.files.len();
        if self.state.cursor >= total {
            self.transition(JobPhase::Saving);
            return;
        }

        let filename = &self.files[self.state.cursor];
        let file_path = self.request.image_folder.join(filename);
        let base_name = file_stem(filename);

        match convert_one(
            &mut *self.host,
            &file_path,
            &base_name,
            &self.state.reserved_names,
            &self.settings,
        ) {
            Ok(record) => {
                self.state.reserved_names.insert(record.brush_name.clone());
                self.state.produced_records.push(record);
            }
            Err(failure) => {
                tracing::warn!("{}", failure);
                self.state.failures.push(failure);
            }
        }

        self.state.cursor += 1;
        self.progress.update(self.state.cursor);

        if self.state.cursor == total {
            self.transition(JobPhase::Saving);
        }
    }

    fn save(&mut self) {
        let target = self.request.library_path();

        match self.host.save_all(&target) {
            Ok(()) => {
                tracing::info!(
                    "Saved {} brush assets in {:?}",
                    self.state.produced_records.len(),
                    target
                );
                self.saved_path = Some(target);
                self.finish(JobPhase::Done);
            }
            Err(err) => {
                let err = ImportError::SaveFailed {
                    path: target.display().to_string(),
                    reason: err.to_string(),
                };
                tracing::error!("{}", err);
                self.error = Some(err);
                self.finish(JobPhase::Aborted);
            }
        }
    }

    fn abort(&mut self, err: ImportError) {
        tracing::error!("Batch import aborted: {}", err);
        self.error = Some(err);
        self.finish(JobPhase::Aborted);
    }

    /// Enter a terminal phase and release timer and progress exactly once
    fn finish(&mut self, phase: JobPhase) {
        self.transition(phase);
        self.state.completed = true;
        self.timer = None;
        if self.progress_active {
            self.progress.end();
            self.progress_active = false;
        }
    }

    fn transition(&mut self, next: JobPhase) {
        tracing::debug!("Batch import phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The timer this job wants ticks from; `None` once released
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.tick_interval()
    }

    pub fn request(&self) -> &JobRequest {
        &self.request
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn error(&self) -> Option<&ImportError> {
        self.error.as_ref()
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// Report for the current phase
    pub fn report(&self) -> ImportSummary {
        let outcome = match self.phase {
            JobPhase::Done => ImportOutcome::Completed,
            JobPhase::Cancelled => ImportOutcome::Cancelled,
            JobPhase::Aborted => match self.error {
                Some(ImportError::SaveFailed { .. }) => ImportOutcome::SaveFailed,
                _ => ImportOutcome::Aborted,
            },
            _ => ImportOutcome::InProgress,
        };

        ImportSummary {
            outcome,
            total_files: self.files.len(),
            processed: self.state.cursor,
            saved_count: self.state.produced_records.len(),
            output_path: self
                .saved_path
                .as_ref()
                .map(|path| path.display().to_string()),
            brush_names: self
                .state
                .produced_records
                .iter()
                .map(|record| record.brush_name.clone())
                .collect(),
            failures: self.state.failures.clone(),
            error: self.error.as_ref().map(ToString::to_string),
        }
    }
}
