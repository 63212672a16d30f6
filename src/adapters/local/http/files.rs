use super::AppState;
use crate::application::service::parse_id;
use crate::error::JobError;
use crate::ports::extractor::MediaExtractor;
use crate::ports::repository::JobRepository;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use tokio_util::io::ReaderStream;

/// Quoted-string safe filename for `Content-Disposition`.
fn attachment_name(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect();
    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

pub async fn get_file<R, E>(
    State(state): State<AppState<R, E>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(_) => return Redirect::to("/").into_response(),
    };

    let artifact = match state.service.resolve(&id).await {
        Ok(artifact) => artifact,
        Err(JobError::Pending { .. }) => {
            return Redirect::to(&format!("/status/{}", id)).into_response()
        }
        Err(JobError::NotFound(_)) => return Redirect::to("/").into_response(),
        Err(e) => return e.into_response(),
    };

    let content_type = mime_guess::from_path(&artifact.path)
        .first_or_octet_stream()
        .to_string();
    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_name(&artifact.filename)
    );
    tracing::info!(job_id = %id, bytes = artifact.len, "serving artifact");

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, artifact.len.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(artifact.file)),
    )
        .into_response()
}
