//! Bridges engine progress events into job store updates.

use crate::domain::jobs::JobId;
use crate::domain::progress::{ProgressEvent, ProgressPhase};
use crate::error::JobError;
use crate::ports::extractor::ProgressSink;
use crate::ports::repository::JobRepository;
use std::sync::Arc;

/// Progress sink bound to a single job at construction time.
pub struct ProgressReporter<R: ?Sized> {
    store: Arc<R>,
    job_id: JobId,
}

impl<R> ProgressReporter<R>
where
    R: JobRepository + ?Sized,
{
    pub fn new(store: Arc<R>, job_id: JobId) -> Self {
        Self { store, job_id }
    }
}

impl<R> ProgressSink for ProgressReporter<R>
where
    R: JobRepository + ?Sized,
{
    fn report(&self, event: ProgressEvent) {
        let result = self.store.update(&self.job_id, &mut |job| {
            match &event.phase {
                ProgressPhase::Downloading => {
                    job.record_progress(&event.percent, &event.rate, &event.eta);
                }
                ProgressPhase::Finished => {
                    job.mark_processing();
                }
                ProgressPhase::Other(_) => {}
            }
            Ok(())
        });

        match result {
            Ok(()) => tracing::trace!(
                job_id = %self.job_id,
                phase = ?event.phase,
                percent = %event.percent,
                "progress"
            ),
            Err(JobError::NotFound(_)) => {
                tracing::debug!(job_id = %self.job_id, "progress for unknown job dropped")
            }
            Err(e) => tracing::warn!(job_id = %self.job_id, error = %e, "progress update failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryJobStore;
    use crate::domain::jobs::{JobState, MediaKind};

    fn setup() -> (Arc<MemoryJobStore>, JobId) {
        let store = Arc::new(MemoryJobStore::new());
        let id = store.create("https://valid.example/video1", MediaKind::Video);
        store.update(&id, &mut |job| job.begin_extracting()).unwrap();
        (store, id)
    }

    #[test]
    fn test_downloading_event_refreshes_progress() {
        let (store, id) = setup();
        let reporter = ProgressReporter::new(store.clone(), id);

        reporter.report(ProgressEvent::downloading(" 10.0%", "1.00MiB/s", "00:09"));
        reporter.report(ProgressEvent::downloading(" 20.0%", "2.00MiB/s", "00:04"));

        let job = store.get(&id).unwrap();
        assert_eq!(job.state(), JobState::Downloading);
        assert_eq!(job.progress_percent, " 20.0%");
        assert_eq!(job.transfer_rate, "2.00MiB/s");
        assert_eq!(job.eta, "00:04");
    }

    #[test]
    fn test_finished_event_moves_to_processing() {
        let (store, id) = setup();
        let reporter = ProgressReporter::new(store.clone(), id);
        reporter.report(ProgressEvent::downloading("100%", "1MiB/s", "00:00"));
        reporter.report(ProgressEvent::finished());
        assert_eq!(store.get(&id).unwrap().state(), JobState::Processing);

        // A second stream (e.g. separate audio track) must not move the job back.
        reporter.report(ProgressEvent::downloading("3%", "1MiB/s", "00:30"));
        assert_eq!(store.get(&id).unwrap().state(), JobState::Processing);
    }

    #[test]
    fn test_unknown_job_is_a_no_op() {
        let store = Arc::new(MemoryJobStore::new());
        let reporter = ProgressReporter::new(store.clone(), JobId::new());
        reporter.report(ProgressEvent::downloading("1%", "1KiB/s", "10:00"));
        reporter.report(ProgressEvent::finished());
        assert!(store.is_empty());
    }

    #[test]
    fn test_other_phases_are_ignored() {
        let (store, id) = setup();
        let reporter = ProgressReporter::new(store.clone(), id);
        reporter.report(ProgressEvent {
            phase: ProgressPhase::Other("error".to_string()),
            percent: "5%".to_string(),
            rate: String::new(),
            eta: String::new(),
        });
        let job = store.get(&id).unwrap();
        assert_eq!(job.state(), JobState::Extracting);
        assert_eq!(job.progress_percent, "0%");
    }

    #[test]
    fn test_reports_from_many_threads_stay_on_their_job() {
        let store = Arc::new(MemoryJobStore::new());
        let a = store.create("https://valid.example/a", MediaKind::Video);
        let b = store.create("https://valid.example/b", MediaKind::Audio);

        let threads: Vec<_> = [(a, "A"), (b, "B")]
            .into_iter()
            .map(|(id, tag)| {
                let reporter = ProgressReporter::new(store.clone(), id);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        reporter.report(ProgressEvent::downloading(
                            format!("{}%", i),
                            format!("{}-rate", tag),
                            format!("{}-eta", tag),
                        ));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let job_a = store.get(&a).unwrap();
        let job_b = store.get(&b).unwrap();
        assert_eq!(job_a.transfer_rate, "A-rate");
        assert_eq!(job_b.transfer_rate, "B-rate");
        assert_eq!(job_a.progress_percent, "199%");
        assert_eq!(job_b.eta, "B-eta");
    }
}
