use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracker_core::TrackerError;

/// Carries an explicit 400 through the `anyhow::Error` chain for problems
/// detected in the HTTP layer itself.
#[derive(Debug)]
struct BadRequest(String);

impl std::fmt::Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for BadRequest {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Renders as `{"error": "..."}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequest(msg.into()).into())
    }

    pub(crate) fn join(e: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {e}"))
    }
}

fn status_for(e: &TrackerError) -> StatusCode {
    match e {
        TrackerError::StakeholderNotFound(_)
        | TrackerError::UploadNotFound(_)
        | TrackerError::TaskNotFound(_)
        | TrackerError::QualityCheckNotFound(_)
        | TrackerError::TestCaseNotFound(_)
        | TrackerError::TestRunNotFound(_)
        | TrackerError::DefectNotFound(_)
        | TrackerError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        TrackerError::GateBlocked(_) | TrackerError::InvalidTransition { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TrackerError::NotInitialized
        | TrackerError::NoSession
        | TrackerError::InvalidStage(_)
        | TrackerError::InvalidStatus(_)
        | TrackerError::InvalidInput(_)
        | TrackerError::InvalidRequirementId(_) => StatusCode::BAD_REQUEST,
        TrackerError::Io(_) | TrackerError::Yaml(_) | TrackerError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<BadRequest>().is_some() {
            StatusCode::BAD_REQUEST
        } else if let Some(e) = self.0.downcast_ref::<TrackerError>() {
            status_for(e)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
