//! Progress events emitted by the extraction engine.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressPhase {
    Downloading,
    /// All bytes are on disk; post-processing may still run.
    Finished,
    Other(String),
}

impl ProgressPhase {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "downloading" => ProgressPhase::Downloading,
            "finished" => ProgressPhase::Finished,
            other => ProgressPhase::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub percent: String,
    pub rate: String,
    pub eta: String,
}

impl ProgressEvent {
    pub fn downloading(
        percent: impl Into<String>,
        rate: impl Into<String>,
        eta: impl Into<String>,
    ) -> Self {
        Self {
            phase: ProgressPhase::Downloading,
            percent: percent.into(),
            rate: rate.into(),
            eta: eta.into(),
        }
    }

    pub fn finished() -> Self {
        Self {
            phase: ProgressPhase::Finished,
            percent: "100%".to_string(),
            rate: String::new(),
            eta: String::new(),
        }
    }
}
