//! Mediafetch - Asynchronous media download service
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (jobs, progress events, diagnostics cleanup)
//! - ports/: Trait definitions (job store, extraction engine, download directory)
//! - adapters/: Concrete implementations (in-memory store, yt-dlp, HTTP, local files)
//! - application/: Job service, runner and progress reporter
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod telemetry;

// Re-exports for convenience
pub use adapters::memory::MemoryJobStore;
pub use adapters::ytdlp::YtDlpExtractor;
pub use application::service::{Artifact, JobService};
pub use config::AppConfig;
pub use domain::jobs::{JobId, JobSnapshot, JobState, MediaKind};
pub use error::{ExtractError, JobError};
