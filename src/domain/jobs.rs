use crate::error::JobError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// Title shown until the engine reports the real one.
pub const TITLE_PLACEHOLDER: &str = "Extracting media info...";

/// Title used when the engine returns metadata without a title.
pub const FALLBACK_TITLE: &str = "Media";

/// Opaque job handle. Random 128-bit, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }

    /// Prefix every output file of this job starts with.
    pub fn file_prefix(&self) -> String {
        format!("{}_", self.0)
    }

    /// Name offered to users for one of this job's files: the on-disk name
    /// without the job prefix.
    pub fn display_name(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.strip_prefix(&self.file_prefix()) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => name,
        }
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "audio" | "mp3" => Ok(MediaKind::Audio),
            other => Err(JobError::InvalidInput(format!("unknown media kind '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Extracting,
    Downloading,
    Processing,
    Complete,
    Error,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Extracting => "extracting",
            JobState::Downloading => "downloading",
            JobState::Processing => "processing",
            JobState::Complete => "complete",
            JobState::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete | JobState::Error)
    }

    fn rank(&self) -> u8 {
        match self {
            JobState::Queued => 0,
            JobState::Extracting => 1,
            JobState::Downloading => 2,
            JobState::Processing => 3,
            JobState::Complete => 4,
            JobState::Error => 5,
        }
    }

    /// Forward-only along the pipeline; `Error` from anything non-terminal.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            JobState::Error => true,
            _ => next.rank() > self.rank(),
        }
    }

    /// True once the job has moved beyond `other` in pipeline order.
    pub fn is_past(&self, other: JobState) -> bool {
        self.rank() > other.rank()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single fetch-and-transcode request and everything known about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub source_url: String,
    pub kind: MediaKind,
    state: JobState,
    pub title: String,
    pub progress_percent: String,
    pub transfer_rate: String,
    pub eta: String,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    output_path: Option<PathBuf>,
    error_message: Option<String>,
}

impl Job {
    pub fn new(id: JobId, source_url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id,
            source_url: source_url.into(),
            kind,
            state: JobState::Queued,
            title: TITLE_PLACEHOLDER.to_string(),
            progress_percent: "0%".to_string(),
            transfer_rate: "N/A".to_string(),
            eta: "N/A".to_string(),
            created_at: Utc::now(),
            started_at: None,
            output_path: None,
            error_message: None,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output_path.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn advance(&mut self, next: JobState) -> Result<(), JobError> {
        if !self.state.can_transition_to(next) {
            return Err(JobError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn begin_extracting(&mut self) -> Result<(), JobError> {
        self.advance(JobState::Extracting)
    }

    pub fn record_metadata(&mut self, title: Option<String>) {
        self.title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        self.started_at = Some(Utc::now());
    }

    /// Applies a download progress tick. Returns false when the job is
    /// already terminal and the tick was dropped.
    pub fn record_progress(&mut self, percent: &str, rate: &str, eta: &str) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        if !self.state.is_past(JobState::Extracting) {
            self.state = JobState::Downloading;
        }
        self.progress_percent = percent.to_string();
        self.transfer_rate = rate.to_string();
        self.eta = eta.to_string();
        true
    }

    /// Download bytes are done; post-processing may follow.
    pub fn mark_processing(&mut self) -> bool {
        if self.state.is_terminal() || self.state.is_past(JobState::Downloading) {
            return false;
        }
        self.state = JobState::Processing;
        true
    }

    pub fn complete(&mut self, output_path: PathBuf) -> Result<(), JobError> {
        if output_path.as_os_str().is_empty() {
            return Err(JobError::InvalidInput("empty output path".to_string()));
        }
        self.advance(JobState::Complete)?;
        self.output_path = Some(output_path);
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), JobError> {
        self.advance(JobState::Error)?;
        let message = message.into();
        self.error_message = Some(if message.trim().is_empty() {
            "unknown error".to_string()
        } else {
            message
        });
        Ok(())
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            status: self.state,
            kind: self.kind,
            url: self.source_url.clone(),
            title: self.title.clone(),
            progress: self.progress_percent.clone(),
            speed: self.transfer_rate.clone(),
            eta: self.eta.clone(),
            error: self.error_message.clone(),
            filename: self
                .output_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned()),
            created_at: self.created_at,
            started_at: self.started_at,
        }
    }
}

/// Read-only view of a job, shaped for the JSON polling endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub status: JobState,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub title: String,
    pub progress: String,
    pub speed: String,
    pub eta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn job() -> Job {
        Job::new(JobId::new(), "https://valid.example/video1", MediaKind::Video)
    }

    #[test]
    fn test_new_job_is_queued_with_placeholders() {
        let job = job();
        assert_eq!(job.state(), JobState::Queued);
        assert_eq!(job.title, TITLE_PLACEHOLDER);
        assert_eq!(job.progress_percent, "0%");
        assert!(job.output_path().is_none());
        assert!(job.error_message().is_none());
    }

    #[test]
    fn test_forward_transitions_only() {
        assert!(JobState::Queued.can_transition_to(JobState::Extracting));
        assert!(JobState::Extracting.can_transition_to(JobState::Complete));
        assert!(!JobState::Processing.can_transition_to(JobState::Downloading));
        assert!(JobState::Processing.can_transition_to(JobState::Error));
        assert!(!JobState::Complete.can_transition_to(JobState::Error));
        assert!(!JobState::Error.can_transition_to(JobState::Complete));
    }

    #[test]
    fn test_progress_moves_to_downloading_but_never_backwards() {
        let mut job = job();
        job.begin_extracting().unwrap();
        assert!(job.record_progress("12.5%", "1.0MiB/s", "00:10"));
        assert_eq!(job.state(), JobState::Downloading);

        assert!(job.mark_processing());
        assert!(job.record_progress("100%", "2.0MiB/s", "00:00"));
        assert_eq!(job.state(), JobState::Processing);
        assert_eq!(job.progress_percent, "100%");
    }

    #[test]
    fn test_terminal_jobs_ignore_progress() {
        let mut job = job();
        job.fail("boom").unwrap();
        assert!(!job.record_progress("50%", "x", "y"));
        assert!(!job.mark_processing());
        assert_eq!(job.progress_percent, "0%");
        assert!(job.complete(PathBuf::from("/tmp/x.mp4")).is_err());
    }

    #[test]
    fn test_empty_error_message_is_replaced() {
        let mut job = job();
        job.fail("  ").unwrap();
        assert_eq!(job.error_message(), Some("unknown error"));
    }

    #[test]
    fn test_complete_rejects_empty_path() {
        let mut job = job();
        assert!(matches!(
            job.complete(PathBuf::new()),
            Err(JobError::InvalidInput(_))
        ));
        assert_eq!(job.state(), JobState::Queued);
    }

    #[test]
    fn test_metadata_falls_back_to_default_title() {
        let mut job = job();
        job.record_metadata(None);
        assert_eq!(job.title, FALLBACK_TITLE);
        assert!(job.started_at.is_some());
        job.record_metadata(Some("Never Gonna".to_string()));
        assert_eq!(job.title, "Never Gonna");
    }

    #[test]
    fn test_display_name_strips_prefix() {
        let id = JobId::new();
        let path = PathBuf::from(format!("/d/{}_My Song.mp3", id));
        assert_eq!(id.display_name(&path), "My Song.mp3");
        assert_eq!(id.display_name(Path::new("/d/plain.mp3")), "plain.mp3");
        let bare = PathBuf::from(format!("/d/{}_", id));
        assert_eq!(id.display_name(&bare), format!("{}_", id));
    }

    #[test]
    fn test_media_kind_parsing() {
        assert_eq!("audio".parse::<MediaKind>().unwrap(), MediaKind::Audio);
        assert_eq!("MP3".parse::<MediaKind>().unwrap(), MediaKind::Audio);
        assert_eq!(" video ".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert!("gif".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_snapshot_serializes_polling_fields() {
        let mut job = job();
        job.begin_extracting().unwrap();
        job.record_progress("42%", "3MiB/s", "00:03");
        let value = serde_json::to_value(job.snapshot()).unwrap();
        assert_eq!(value["status"], "downloading");
        assert_eq!(value["type"], "video");
        assert_eq!(value["progress"], "42%");
        assert_eq!(value["speed"], "3MiB/s");
        assert!(value.get("error").is_none());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Extract,
        Progress,
        Processing,
        Complete,
        Fail,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Extract),
            Just(Op::Progress),
            Just(Op::Processing),
            Just(Op::Complete),
            Just(Op::Fail),
        ]
    }

    proptest! {
        #[test]
        fn prop_output_and_error_track_terminal_state(ops in prop::collection::vec(op(), 0..24)) {
            let mut job = job();
            let mut previous = job.state();
            for op in ops {
                let _ = match op {
                    Op::Extract => job.begin_extracting().map(|_| true),
                    Op::Progress => Ok(job.record_progress("1%", "1KiB/s", "01:00")),
                    Op::Processing => Ok(job.mark_processing()),
                    Op::Complete => job.complete(PathBuf::from("/downloads/x_a.mp4")).map(|_| true),
                    Op::Fail => job.fail("network unreachable").map(|_| true),
                };
                let state = job.state();
                prop_assert_eq!(job.output_path().is_some(), state == JobState::Complete);
                prop_assert_eq!(job.error_message().is_some(), state == JobState::Error);
                prop_assert!(state == previous || previous.can_transition_to(state));
                previous = state;
            }
        }
    }
}
