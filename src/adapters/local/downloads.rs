//! Local download directory: creation and artifact discovery.

use crate::domain::jobs::JobId;
use crate::ports::artifacts::ArtifactStore;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Suffixes the engine uses for in-flight or intermediate files.
const TEMPORARY_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp", ".tmp"];

fn is_temporary(name: &str) -> bool {
    TEMPORARY_SUFFIXES.iter().any(|s| name.ends_with(s)) || name.contains(".part-Frag")
}

#[derive(Debug, Clone)]
pub struct DownloadDir {
    root: PathBuf,
}

impl DownloadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the directory if missing and anchors it to an absolute path.
    pub async fn create(root: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(root).await?;
        let root = tokio::fs::canonicalize(root).await?;
        Ok(Self { root })
    }
}

#[async_trait]
impl ArtifactStore for DownloadDir {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn locate(
        &self,
        id: &JobId,
        preferred_ext: Option<&str>,
    ) -> io::Result<Option<PathBuf>> {
        let prefix = id.file_prefix();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(&prefix) || is_temporary(&name) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            candidates.push(entry.path());
        }
        candidates.sort();

        if let Some(ext) = preferred_ext {
            if let Some(found) = candidates.iter().find(|p| {
                p.extension()
                    .map(|e| e.eq_ignore_ascii_case(ext))
                    .unwrap_or(false)
            }) {
                return Ok(Some(found.clone()));
            }
        }
        Ok(candidates.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_makes_absolute_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let downloads = DownloadDir::create(&nested).await.unwrap();
        assert!(downloads.root().is_absolute());
        assert!(downloads.root().is_dir());
    }

    #[tokio::test]
    async fn test_locate_artifact_by_prefix() {
        let dir = tempdir().unwrap();
        let downloads = DownloadDir::new(dir.path());
        let id = JobId::new();
        let other = JobId::new();
        std::fs::write(dir.path().join(format!("{}_Other.mp4", other)), b"x").unwrap();
        std::fs::write(dir.path().join(format!("{}_Clip.webm", id)), b"data").unwrap();

        let found = downloads.locate(&id, None).await.unwrap().unwrap();
        assert_eq!(found.file_name().unwrap().to_string_lossy(), format!("{}_Clip.webm", id));
    }

    #[tokio::test]
    async fn test_locate_artifact_skips_partial_files() {
        let dir = tempdir().unwrap();
        let downloads = DownloadDir::new(dir.path());
        let id = JobId::new();
        std::fs::write(dir.path().join(format!("{}_Clip.mp4.part", id)), b"x").unwrap();
        std::fs::write(dir.path().join(format!("{}_Clip.mp4.ytdl", id)), b"x").unwrap();
        std::fs::write(dir.path().join(format!("{}_Clip.f137.mp4.part-Frag3", id)), b"x").unwrap();

        assert!(downloads.locate(&id, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_locate_artifact_prefers_extension() {
        let dir = tempdir().unwrap();
        let downloads = DownloadDir::new(dir.path());
        let id = JobId::new();
        std::fs::write(dir.path().join(format!("{}_Song.m4a", id)), b"x").unwrap();
        std::fs::write(dir.path().join(format!("{}_Song.mp3", id)), b"x").unwrap();

        let found = downloads.locate(&id, Some("mp3")).await.unwrap().unwrap();
        assert_eq!(found.extension().unwrap(), "mp3");
    }

    #[tokio::test]
    async fn test_locate_artifact_missing_dir_is_error() {
        let dir = tempdir().unwrap();
        let downloads = DownloadDir::new(dir.path().join("nope"));
        assert!(downloads.locate(&JobId::new(), None).await.is_err());
    }
}
