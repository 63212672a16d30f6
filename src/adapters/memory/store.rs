//! In-memory `JobRepository` with per-record locking.

use crate::domain::jobs::{Job, JobId, MediaKind};
use crate::error::JobError;
use crate::ports::repository::JobRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// The map lock is only held to look up or insert a record handle; mutations
/// lock the record itself, so updates to different jobs do not serialize.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, Arc<Mutex<Job>>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, id: &JobId) -> Result<Arc<Mutex<Job>>, JobError> {
        let jobs = self.jobs.read().unwrap_or_else(|e| e.into_inner());
        jobs.get(id)
            .cloned()
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    pub fn ids(&self) -> Vec<JobId> {
        let jobs = self.jobs.read().unwrap_or_else(|e| e.into_inner());
        jobs.keys().copied().collect()
    }
}

impl JobRepository for MemoryJobStore {
    fn create(&self, source_url: &str, kind: MediaKind) -> JobId {
        let mut jobs = self.jobs.write().unwrap_or_else(|e| e.into_inner());
        let mut id = JobId::new();
        while jobs.contains_key(&id) {
            id = JobId::new();
        }
        jobs.insert(id, Arc::new(Mutex::new(Job::new(id, source_url, kind))));
        id
    }

    fn get(&self, id: &JobId) -> Result<Job, JobError> {
        let record = self.record(id)?;
        let job = record.lock().unwrap_or_else(|e| e.into_inner());
        Ok(job.clone())
    }

    fn update(
        &self,
        id: &JobId,
        mutator: &mut dyn FnMut(&mut Job) -> Result<(), JobError>,
    ) -> Result<(), JobError> {
        let record = self.record(id)?;
        let mut job = record.lock().unwrap_or_else(|e| e.into_inner());
        // Mutate a scratch copy so a failed mutator leaves the record untouched.
        let mut draft = job.clone();
        mutator(&mut draft)?;
        *job = draft;
        Ok(())
    }

    fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
