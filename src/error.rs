//! Error types surfaced by the job service and the extraction engine port.

use crate::domain::jobs::{JobId, JobState};
use thiserror::Error;

/// Errors returned synchronously to callers of the job service.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("job not found: {0}")]
    NotFound(String),

    /// The artifact was requested before the job reached `Complete`.
    #[error("job {id} is not ready (state: {state})")]
    Pending { id: JobId, state: JobState },

    #[error("illegal transition {from} -> {to}")]
    InvalidTransition { from: JobState, to: JobState },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by the extraction engine.
///
/// These never reach a caller of the service: the runner records them on the
/// job instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to launch extractor: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("error reading extractor output: {0}")]
    Output(#[source] std::io::Error),

    #[error("{0}")]
    Failed(String),

    #[error("could not read media metadata: {0}")]
    Metadata(String),
}
