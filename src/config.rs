//! Configuration loaded from the environment (and an optional `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Directory the engine writes finished files into
    pub download_dir: PathBuf,
    /// yt-dlp executable (name on PATH or absolute path)
    pub ytdlp_path: PathBuf,
    /// Directory holding ffmpeg/ffprobe, when not on PATH
    pub ffmpeg_location: Option<PathBuf>,
    /// Files older than this are removed by the cleanup sweep
    pub cleanup_max_age: Duration,
    pub cleanup_interval: Duration,
    /// How long shutdown waits for running jobs
    pub shutdown_grace: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: String::from("127.0.0.1"),
            port: String::from("5000"),
            download_dir: PathBuf::from("./downloads"),
            ytdlp_path: PathBuf::from("yt-dlp"),
            ffmpeg_location: None,
            cleanup_max_age: Duration::from_secs(3600),
            cleanup_interval: Duration::from_secs(600),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset or unparsable
    /// values fall back to the defaults, as does a zero cleanup interval.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            addr: lookup("ADDR").unwrap_or(defaults.addr),
            port: lookup("PORT").unwrap_or(defaults.port),
            download_dir: lookup("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            ytdlp_path: lookup("YTDLP_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ytdlp_path),
            ffmpeg_location: lookup("FFMPEG_LOCATION")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            cleanup_max_age: secs("CLEANUP_MAX_AGE_SECS", defaults.cleanup_max_age),
            cleanup_interval: Some(secs("CLEANUP_INTERVAL_SECS", defaults.cleanup_interval))
                .filter(|every| !every.is_zero())
                .unwrap_or(defaults.cleanup_interval),
            shutdown_grace: secs("SHUTDOWN_GRACE_SECS", defaults.shutdown_grace),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}
