use crate::domain::jobs::{Job, JobId, MediaKind};
use crate::error::JobError;

/// Job Store: the single source of truth for job status.
///
/// Methods are synchronous so the progress reporter can call them from
/// whatever context the engine reports from. Implementations must never hold
/// a lock across an await point.
pub trait JobRepository: Send + Sync {
    /// Insert a fresh `Queued` job and return its identity.
    fn create(&self, source_url: &str, kind: MediaKind) -> JobId;

    /// Owned copy of the current record.
    fn get(&self, id: &JobId) -> Result<Job, JobError>;

    /// Run `mutator` with exclusive access to a single record.
    fn update(
        &self,
        id: &JobId,
        mutator: &mut dyn FnMut(&mut Job) -> Result<(), JobError>,
    ) -> Result<(), JobError>;

    /// Number of jobs ever created.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
