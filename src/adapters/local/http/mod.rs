//! HTTP inbound adapter.
//!
//! Form-driven pages plus a small JSON surface over `JobService`:
//! - `GET /`                     submission form
//! - `POST /download`            form submit, redirects to the status page
//! - `GET /status/:id`           status page polling `/check_status/:id`
//! - `GET /check_status/:id`     JSON snapshot
//! - `GET /get_file/:id`         artifact download
//! - `POST /api/jobs`            JSON submit
//! - `GET /api/jobs/:id`         JSON snapshot with typed errors

mod error;
mod files;
mod jobs;
mod pages;

use crate::application::service::JobService;
use crate::ports::extractor::MediaExtractor;
use crate::ports::repository::JobRepository;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub struct AppState<R, E> {
    pub service: JobService<R, E>,
}

impl<R, E> Clone for AppState<R, E> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

pub fn router<R, E>(service: JobService<R, E>) -> Router
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    Router::new()
        .route("/", get(pages::index))
        .route("/download", post(jobs::submit_form::<R, E>))
        .route("/status/:id", get(pages::status::<R, E>))
        .route("/check_status/:id", get(jobs::check_status::<R, E>))
        .route("/get_file/:id", get(files::get_file::<R, E>))
        .route("/api/jobs", post(jobs::submit_json::<R, E>))
        .route("/api/jobs/:id", get(jobs::get_job::<R, E>))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}
