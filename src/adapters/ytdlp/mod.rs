//! `yt-dlp` adapter for the `MediaExtractor` port.
//!
//! The binary is driven through `tokio::process`; progress is read line by
//! line from stdout using a machine-readable progress template.

mod args;
mod progress;

pub use args::{build_download_args, build_metadata_args, PROGRESS_MARKER};
pub use progress::parse_progress_line;

use crate::error::ExtractError;
use crate::ports::extractor::{ExtractOptions, MediaExtractor, MediaMetadata, ProgressSink};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: PathBuf,
    ffmpeg_location: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct InfoJson {
    title: Option<String>,
    duration: Option<f64>,
    filesize: Option<u64>,
    filesize_approx: Option<f64>,
    resolution: Option<String>,
}

impl From<InfoJson> for MediaMetadata {
    fn from(info: InfoJson) -> Self {
        MediaMetadata {
            title: info.title,
            duration: info.duration,
            filesize: info
                .filesize
                .or_else(|| info.filesize_approx.map(|f| f.max(0.0) as u64)),
            resolution: info.resolution,
        }
    }
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<PathBuf>, ffmpeg_location: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ffmpeg_location,
        }
    }

    fn command(&self, args: Vec<String>) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

/// Picks the most useful line of a failed run's stderr.
pub fn failure_message(stderr: &str, status: ExitStatus) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find(|l| l.contains("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| format!("yt-dlp exited with {}", status))
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract_metadata(
        &self,
        url: &str,
        opts: &ExtractOptions,
    ) -> Result<MediaMetadata, ExtractError> {
        let args = build_metadata_args(url, opts, self.ffmpeg_location.as_deref());
        let output = self
            .command(args)
            .output()
            .await
            .map_err(ExtractError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Failed(failure_message(&stderr, output.status)));
        }

        let info: InfoJson = serde_json::from_slice(&output.stdout)
            .map_err(|e| ExtractError::Metadata(e.to_string()))?;
        Ok(info.into())
    }

    async fn download(
        &self,
        url: &str,
        opts: &ExtractOptions,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<(), ExtractError> {
        let args = build_download_args(url, opts, self.ffmpeg_location.as_deref());
        let mut child = self.command(args).spawn().map_err(ExtractError::Spawn)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let read_progress = async {
            if let Some(stdout) = stdout {
                let mut reader = BufReader::new(stdout);
                let mut buf = Vec::new();
                loop {
                    buf.clear();
                    let read = reader
                        .read_until(b'\n', &mut buf)
                        .await
                        .map_err(ExtractError::Output)?;
                    if read == 0 {
                        break;
                    }
                    // Titles are not guaranteed to be UTF-8.
                    let line = String::from_utf8_lossy(&buf);
                    match parse_progress_line(&line) {
                        Some(event) => sink.report(event),
                        None => tracing::trace!(line = %line.trim_end(), "yt-dlp"),
                    }
                }
            }
            Ok::<(), ExtractError>(())
        };
        let read_stderr = async {
            let mut collected = Vec::new();
            if let Some(mut stderr) = stderr {
                if let Err(e) = stderr.read_to_end(&mut collected).await {
                    tracing::debug!(error = %e, "yt-dlp stderr closed early");
                }
            }
            String::from_utf8_lossy(&collected).into_owned()
        };

        let (progress, stderr) = futures::join!(read_progress, read_stderr);
        progress?;
        let status = child.wait().await.map_err(ExtractError::Spawn)?;
        if status.success() {
            Ok(())
        } else {
            Err(ExtractError::Failed(failure_message(&stderr, status)))
        }
    }
}
