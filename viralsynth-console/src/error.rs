//! Error types for the console's JSON endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use viralsynth_common::FetchError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409), e.g. a submission already in flight
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend call failed (502)
    #[error("Backend error: {0}")]
    BadGateway(FetchError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<viralsynth_common::Error> for ApiError {
    fn from(err: viralsynth_common::Error) -> Self {
        use viralsynth_common::Error;
        match err {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::Busy(msg) => ApiError::Conflict(msg),
            e @ Error::InvalidTransition { .. } => ApiError::Conflict(e.to_string()),
            Error::Fetch(e) => ApiError::BadGateway(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, upstream) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::BadGateway(err) => (
                StatusCode::BAD_GATEWAY,
                "BACKEND_ERROR",
                err.user_message(),
                err.status(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
                None,
            ),
        };

        let mut error = json!({
            "code": error_code,
            "message": message,
        });
        if let Some(code) = upstream {
            error["upstream_status"] = json!(code);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
