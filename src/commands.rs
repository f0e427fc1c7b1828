//! Command layer - the interface between the CLI shell and the import job

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::time::MissedTickBehavior;

use crate::assets::{AssetHost, AssetSession};
use crate::config::ImportSettings;
use crate::import::{BatchImportJob, ImportSummary, JobRequest, ProgressSink, TickKind};

/// Terminal progress bar backed by `indicatif`
#[derive(Default)]
pub struct TerminalProgress {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that accepts progress but draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: None,
            hidden: true,
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn begin(&mut self, total: usize) {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        bar.set_length(total as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} images")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        self.bar = Some(bar);
    }

    fn update(&mut self, current: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(current as u64);
        }
    }

    fn end(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Build the session the import writes into: a fresh one, or an existing
/// library opened as the starting namespace.
pub fn open_session(
    base_library: Option<&Path>,
    settings: &ImportSettings,
) -> Result<AssetSession, String> {
    let mut session = match base_library {
        Some(path) => AssetSession::open(path)?,
        None => AssetSession::new(),
    };
    session.set_preview_size(settings.preview_size);
    Ok(session)
}

/// Pump timer ticks into `job` until it releases its timer.
///
/// `shutdown` resolving cancels the job between two ticks.
pub async fn drive_job<H, P, F>(job: &mut BatchImportJob<'_, H, P>, shutdown: F) -> ImportSummary
where
    H: AssetHost,
    P: ProgressSink,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut interval = tokio::time::interval(job.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while let Some(timer) = job.timer() {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                job.cancel();
            }
            _ = interval.tick() => {
                job.handle_tick(TickKind::Timer(timer));
            }
        }
    }

    job.report()
}

/// Run a whole batch import and return its report.
///
/// Only setup problems (an unreadable base library) are returned as `Err`;
/// every job outcome, including aborts, comes back as a summary.
pub async fn run_import(
    image_folder: PathBuf,
    output_path: PathBuf,
    base_library: Option<PathBuf>,
    settings: ImportSettings,
    progress: TerminalProgress,
) -> Result<ImportSummary, String> {
    let mut session = open_session(base_library.as_deref(), &settings)?;
    let request = JobRequest::new(image_folder, output_path);

    let mut job = BatchImportJob::submit(request, &mut session, progress, settings);
    let summary = drive_job(&mut job, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await;

    Ok(summary)
}
