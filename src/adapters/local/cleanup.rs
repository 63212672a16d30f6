//! Periodic removal of stale files from the download directory.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;

/// Removes regular files whose modification time is older than `max_age`.
/// Returns the removed paths; files that cannot be removed are skipped.
pub async fn sweep(dir: &Path, max_age: Duration) -> io::Result<Vec<PathBuf>> {
    let now = SystemTime::now();
    let mut removed = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(m) if m.is_file() => m,
            _ => continue,
        };
        let age = metadata
            .modified()
            .ok()
            .and_then(|m| now.duration_since(m).ok())
            .unwrap_or_default();
        if age <= max_age {
            continue;
        }

        let path = entry.path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed.push(path),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove stale file"),
        }
    }
    Ok(removed)
}

/// Lower bound on the sweep period.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns the sweep loop. The first sweep runs immediately.
pub fn start(dir: PathBuf, max_age: Duration, every: Duration) -> JoinHandle<()> {
    let every = every.max(MIN_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match sweep(&dir, max_age).await {
                Ok(removed) if !removed.is_empty() => {
                    tracing::info!(count = removed.len(), "removed stale downloads")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "cleanup sweep failed"),
            }
        }
    })
}
