use super::error::ErrorResponse;
use super::AppState;
use crate::application::service::parse_id;
use crate::domain::jobs::{JobId, JobSnapshot, MediaKind};
use crate::error::JobError;
use crate::ports::extractor::MediaExtractor;
use crate::ports::repository::JobRepository;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub url: String,
    pub download_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: MediaKind,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: JobId,
    pub status_url: String,
}

/// Unknown values fall back to video, matching the form's default.
fn kind_from_form(value: Option<&str>) -> MediaKind {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

pub async fn submit_form<R, E>(
    State(state): State<AppState<R, E>>,
    Form(form): Form<DownloadForm>,
) -> Redirect
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    let kind = kind_from_form(form.download_type.as_deref());
    match state.service.submit(&form.url, kind) {
        Ok(id) => Redirect::to(&format!("/status/{}", id)),
        Err(e) => {
            tracing::debug!(error = %e, "form submission rejected");
            Redirect::to("/")
        }
    }
}

pub async fn submit_json<R, E>(
    State(state): State<AppState<R, E>>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), JobError>
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    let id = state.service.submit(&request.url, request.kind)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            id,
            status_url: format!("/api/jobs/{}", id),
        }),
    ))
}

pub async fn get_job<R, E>(
    State(state): State<AppState<R, E>>,
    Path(raw_id): Path<String>,
) -> Result<Json<JobSnapshot>, JobError>
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    let id = parse_id(&raw_id)?;
    state.service.get_status(&id).map(Json)
}

/// Polling endpoint used by the status page.
pub async fn check_status<R, E>(
    State(state): State<AppState<R, E>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: JobRepository + 'static,
    E: MediaExtractor + 'static,
{
    match parse_id(&raw_id).and_then(|id| state.service.get_status(&id)) {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                status: "not_found",
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
