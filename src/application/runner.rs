//! Launches and supervises one background task per job.

use super::reporter::ProgressReporter;
use crate::domain::jobs::{JobId, MediaKind};
use crate::domain::sanitize::strip_terminal_sequences;
use crate::error::{ExtractError, JobError};
use crate::ports::artifacts::ArtifactStore;
use crate::ports::extractor::{ExtractOptions, MediaExtractor};
use crate::ports::repository::JobRepository;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::Instrument;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Engine(#[from] ExtractError),
    #[error(transparent)]
    Store(#[from] JobError),
    #[error("could not scan download directory: {0}")]
    Scan(#[from] std::io::Error),
    #[error("download finished but no output file was found")]
    MissingOutput,
}

pub struct JobRunner<R, E> {
    store: Arc<R>,
    extractor: Arc<E>,
    artifacts: Arc<dyn ArtifactStore>,
    tracker: TaskTracker,
}

impl<R, E> Clone for JobRunner<R, E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            extractor: self.extractor.clone(),
            artifacts: self.artifacts.clone(),
            tracker: self.tracker.clone(),
        }
    }
}

impl<R, E> JobRunner<R, E>
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    pub fn new(store: Arc<R>, extractor: Arc<E>, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            extractor,
            artifacts,
            tracker: TaskTracker::new(),
        }
    }

    /// Jobs whose task has not finished yet.
    pub fn active_jobs(&self) -> usize {
        self.tracker.len()
    }

    /// Spawns the job task and returns without waiting for it.
    ///
    /// The work runs in its own task; the supervising task records a panic
    /// as a job failure so it never reaches the rest of the process.
    pub fn start(&self, id: JobId, source_url: String, kind: MediaKind) -> JoinHandle<()> {
        let runner = self.clone();
        let span = tracing::info_span!("job", job_id = %id, kind = %kind);

        self.tracker.spawn(
            async move {
                let worker = runner.clone();
                let work = tokio::spawn(
                    async move { worker.run(id, &source_url, kind).await }.in_current_span(),
                );

                if let Err(e) = work.await {
                    let message = if e.is_panic() {
                        "internal error: job task panicked"
                    } else {
                        "internal error: job task was cancelled"
                    };
                    tracing::error!(error = %e, "job task aborted");
                    runner.record_failure(&id, message);
                }
            }
            .instrument(span),
        )
    }

    /// Waits up to `grace` for running jobs. Returns false if some were still
    /// running at the deadline.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        tokio::time::timeout(grace, self.tracker.wait()).await.is_ok()
    }

    async fn run(&self, id: JobId, source_url: &str, kind: MediaKind) {
        match self.execute(id, source_url, kind).await {
            Ok(path) => {
                let result = self.store.update(&id, &mut |job| job.complete(path.clone()));
                match result {
                    Ok(()) => tracing::info!(path = %path.display(), "job complete"),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not mark job complete");
                        self.record_failure(&id, &strip_terminal_sequences(&e.to_string()));
                    }
                }
            }
            Err(e) => {
                let message = strip_terminal_sequences(&e.to_string());
                tracing::warn!(error = %message, "job failed");
                self.record_failure(&id, &message);
            }
        }
    }

    async fn execute(
        &self,
        id: JobId,
        source_url: &str,
        kind: MediaKind,
    ) -> Result<PathBuf, RunError> {
        self.store.update(&id, &mut |job| job.begin_extracting())?;
        tracing::info!(url = %source_url, "extracting metadata");

        let opts = ExtractOptions::for_job(self.artifacts.root(), &id, kind);
        let metadata = self.extractor.extract_metadata(source_url, &opts).await?;
        self.store.update(&id, &mut |job| {
            job.record_metadata(metadata.title.clone());
            Ok(())
        })?;
        tracing::info!(
            title = ?metadata.title,
            duration = ?metadata.duration,
            resolution = ?metadata.resolution,
            filesize = ?metadata.filesize,
            "starting download"
        );

        let reporter = Arc::new(ProgressReporter::new(self.store.clone(), id));
        self.extractor.download(source_url, &opts, reporter).await?;

        self.artifacts
            .locate(&id, opts.profile.output_extension())
            .await?
            .ok_or(RunError::MissingOutput)
    }

    fn record_failure(&self, id: &JobId, message: &str) {
        if let Err(e) = self.store.update(id, &mut |job| job.fail(message)) {
            tracing::warn!(job_id = %id, error = %e, "could not record job failure");
        }
    }
}
