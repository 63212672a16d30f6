use crate::domain::jobs::JobId;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Where the engine writes finished downloads.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Directory handed to the engine as its output location.
    fn root(&self) -> &Path;

    /// Finds the file produced for `id` by its `<id>_` name prefix.
    ///
    /// The on-disk name embeds the title and extension chosen by the engine,
    /// so the prefix is the only stable handle. When `preferred_ext` is set a
    /// matching file wins over other candidates.
    async fn locate(&self, id: &JobId, preferred_ext: Option<&str>)
        -> io::Result<Option<PathBuf>>;
}
