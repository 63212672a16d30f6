use crate::domain::jobs::{JobId, MediaKind};
use crate::domain::progress::ProgressEvent;
use crate::error::ExtractError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Codec and bitrate requested for audio jobs.
pub const AUDIO_CODEC: &str = "mp3";
pub const AUDIO_BITRATE_KBPS: u32 = 192;

/// Receives progress events from the engine for one job.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractProfile {
    /// Best single-file quality, no post-processing.
    BestVideo,
    /// Best audio stream re-encoded to mp3.
    AudioMp3 { bitrate_kbps: u32 },
}

impl ExtractProfile {
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video => ExtractProfile::BestVideo,
            MediaKind::Audio => ExtractProfile::AudioMp3 {
                bitrate_kbps: AUDIO_BITRATE_KBPS,
            },
        }
    }

    pub fn format_selector(&self) -> &'static str {
        match self {
            ExtractProfile::BestVideo => "best",
            ExtractProfile::AudioMp3 { .. } => "bestaudio/best",
        }
    }

    /// Extension the artifact is guaranteed to have, when the profile fixes one.
    pub fn output_extension(&self) -> Option<&'static str> {
        match self {
            ExtractProfile::BestVideo => None,
            ExtractProfile::AudioMp3 { .. } => Some(AUDIO_CODEC),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub output_dir: PathBuf,
    /// File name template; must start with the job's identity prefix.
    pub output_template: String,
    /// Never expand playlists or collections.
    pub single_item: bool,
    pub profile: ExtractProfile,
}

impl ExtractOptions {
    pub fn for_job(output_dir: &Path, id: &JobId, kind: MediaKind) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            output_template: format!("{}%(title)s.%(ext)s", id.file_prefix()),
            single_item: true,
            profile: ExtractProfile::for_kind(kind),
        }
    }

    pub fn output_path_template(&self) -> PathBuf {
        self.output_dir.join(&self.output_template)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub filesize: Option<u64>,
    pub resolution: Option<String>,
}

/// The media extraction/transcoding engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Metadata only, nothing is written to disk.
    async fn extract_metadata(
        &self,
        url: &str,
        opts: &ExtractOptions,
    ) -> Result<MediaMetadata, ExtractError>;

    /// Download (and post-process) into `opts.output_dir`, reporting
    /// progress to `sink` in the order the engine produces it.
    async fn download(
        &self,
        url: &str,
        opts: &ExtractOptions,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<(), ExtractError>;
}
