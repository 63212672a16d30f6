//! CLI Binary - download one URL through the same job pipeline the server uses.

use clap::Parser;
use mediafetch::adapters::local::downloads::DownloadDir;
use mediafetch::ports::artifacts::ArtifactStore;
use mediafetch::{telemetry, AppConfig, JobService, JobState, MediaKind, MemoryJobStore, YtDlpExtractor};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "fetch", about = "Download a video or extract its audio as mp3")]
struct Args {
    /// Media URL
    url: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// What to download: video, audio (or mp3)
    #[arg(short = 't', long = "type", default_value = "video")]
    kind: MediaKind,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = AppConfig::from_env();
    telemetry::init_tracing();

    let downloads = DownloadDir::create(&args.output).await?;
    let output_dir = downloads.root().to_path_buf();
    let extractor = Arc::new(YtDlpExtractor::new(
        config.ytdlp_path.clone(),
        config.ffmpeg_location.clone(),
    ));
    let service = JobService::new(Arc::new(MemoryJobStore::new()), extractor, Arc::new(downloads));

    let id = service.submit(&args.url, args.kind)?;
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    let snapshot = loop {
        ticker.tick().await;
        let snapshot = service.get_status(&id)?;
        match snapshot.status {
            JobState::Downloading => {
                print!(
                    "\rProgress: {} Speed: {} ETA: {}   ",
                    snapshot.progress, snapshot.speed, snapshot.eta
                );
                std::io::stdout().flush()?;
            }
            JobState::Processing => {
                print!("\rDownload finished, now processing file...          ");
                std::io::stdout().flush()?;
            }
            state if state.is_terminal() => break snapshot,
            _ => {}
        }
    };
    println!();

    if snapshot.status == JobState::Error {
        let message = snapshot.error.unwrap_or_default();
        eprintln!("Error downloading {}: {}", args.url, message);
        std::process::exit(1);
    }

    let artifact = service.resolve(&id).await?;
    drop(artifact.file);
    let target = output_dir.join(&artifact.filename);
    let saved = if tokio::fs::try_exists(&target).await? {
        artifact.path
    } else {
        tokio::fs::rename(&artifact.path, &target).await?;
        target
    };
    println!("{} saved to {}", snapshot.title, saved.display());
    Ok(())
}
