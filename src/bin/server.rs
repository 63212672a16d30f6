//! Server Binary - Local deployment
//!
//! Wires up:
//! - In-memory job store
//! - yt-dlp extraction adapter
//! - HTTP inbound adapter (form, status polling, file download)
//! - Stale download sweep

use mediafetch::adapters::local::downloads::DownloadDir;
use mediafetch::adapters::local::{cleanup, http};
use mediafetch::ports::artifacts::ArtifactStore;
use mediafetch::{telemetry, AppConfig, JobService, MemoryJobStore, YtDlpExtractor};
use std::process::Stdio;
use std::sync::Arc;

async fn check_environment(config: &AppConfig) {
    let probe = tokio::process::Command::new(&config.ytdlp_path)
        .arg("--version")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await;
    match probe {
        Ok(output) if output.status.success() => tracing::info!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "found yt-dlp"
        ),
        _ => tracing::warn!(
            path = %config.ytdlp_path.display(),
            "yt-dlp not runnable; every job will fail until it is installed"
        ),
    }

    if let Some(location) = &config.ffmpeg_location {
        if !location.exists() {
            tracing::warn!(
                path = %location.display(),
                "FFMPEG_LOCATION does not exist; audio conversion will fail"
            );
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    telemetry::init_tracing();

    // 1. Environment
    let downloads = DownloadDir::create(&config.download_dir).await?;
    let download_dir = downloads.root().to_path_buf();
    check_environment(&config).await;

    // 2. Adapters
    let store = Arc::new(MemoryJobStore::new());
    let extractor = Arc::new(YtDlpExtractor::new(
        config.ytdlp_path.clone(),
        config.ffmpeg_location.clone(),
    ));

    // 3. Application Service
    let service = JobService::new(store, extractor, Arc::new(downloads));

    // 4. Background sweep
    cleanup::start(
        download_dir.clone(),
        config.cleanup_max_age,
        config.cleanup_interval,
    );

    // 5. HTTP Layer
    let app = http::router(service.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        addr = %config.bind_address(),
        download_dir = %download_dir.display(),
        "listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 6. Let running jobs finish
    if !service.shutdown(config.shutdown_grace).await {
        tracing::warn!(
            active = service.runner().active_jobs(),
            "jobs still running at shutdown"
        );
    }
    Ok(())
}
