//! The contract consumed by transports (HTTP, CLI).

use super::runner::JobRunner;
use crate::domain::jobs::{JobId, JobSnapshot, JobState, MediaKind};
use crate::error::JobError;
use crate::ports::artifacts::ArtifactStore;
use crate::ports::extractor::MediaExtractor;
use crate::ports::repository::JobRepository;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use url::Url;

/// A finished job's output, opened for reading.
#[derive(Debug)]
pub struct Artifact {
    pub file: File,
    pub path: PathBuf,
    /// Suggested download name (job prefix removed).
    pub filename: String,
    pub len: u64,
}

pub struct JobService<R, E> {
    store: Arc<R>,
    runner: JobRunner<R, E>,
}

impl<R, E> Clone for JobService<R, E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            runner: self.runner.clone(),
        }
    }
}

impl<R, E> JobService<R, E>
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    pub fn new(store: Arc<R>, extractor: Arc<E>, artifacts: Arc<dyn ArtifactStore>) -> Self {
        let runner = JobRunner::new(store.clone(), extractor, artifacts);
        Self { store, runner }
    }

    pub fn runner(&self) -> &JobRunner<R, E> {
        &self.runner
    }

    /// Registers a job and starts it in the background.
    pub fn submit(&self, source_url: &str, kind: MediaKind) -> Result<JobId, JobError> {
        let source_url = validate_url(source_url)?;
        let id = self.store.create(&source_url, kind);
        tracing::info!(job_id = %id, kind = %kind, url = %source_url, "job submitted");
        self.runner.start(id, source_url, kind);
        Ok(id)
    }

    pub fn get_status(&self, id: &JobId) -> Result<JobSnapshot, JobError> {
        self.store.get(id).map(|job| job.snapshot())
    }

    /// Opens the produced file; `Pending` until the job is complete.
    pub async fn resolve(&self, id: &JobId) -> Result<Artifact, JobError> {
        let job = self.store.get(id)?;
        let path = match (job.state(), job.output_path()) {
            (JobState::Complete, Some(path)) => path.clone(),
            (state, _) => return Err(JobError::Pending { id: *id, state }),
        };

        let file = File::open(&path).await?;
        let len = file.metadata().await?.len();
        Ok(Artifact {
            file,
            filename: id.display_name(&path),
            path,
            len,
        })
    }

    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.runner.shutdown(grace).await
    }
}

/// Transport helper: a malformed identity is reported like an unknown one.
pub fn parse_id(raw: &str) -> Result<JobId, JobError> {
    JobId::parse(raw).ok_or_else(|| JobError::NotFound(raw.to_string()))
}

fn validate_url(raw: &str) -> Result<String, JobError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JobError::InvalidInput("url must not be empty".to_string()));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|e| JobError::InvalidInput(format!("invalid url '{}': {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(trimmed.to_string()),
        scheme => Err(JobError::InvalidInput(format!(
            "unsupported url '{}' (scheme {})",
            trimmed, scheme
        ))),
    }
}
