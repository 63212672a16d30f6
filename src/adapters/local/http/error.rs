use crate::error::JobError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl JobError {
    fn status_code(&self) -> (StatusCode, &'static str) {
        match self {
            JobError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            JobError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            JobError::Pending { .. } => (StatusCode::CONFLICT, "pending"),
            JobError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (StatusCode::GONE, "gone")
            }
            JobError::InvalidTransition { .. } | JobError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        let (code, status) = self.status_code();
        if code.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            code,
            Json(ErrorResponse {
                status,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
