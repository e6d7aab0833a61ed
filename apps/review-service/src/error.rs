//! Error handling for the review API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use srs_core::SchedulerError;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Scheduler(SchedulerError::InvalidGrade(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_grade")
            }
            ApiError::Scheduler(SchedulerError::NonMonotonicReview { .. }) => {
                (StatusCode::BAD_REQUEST, "non_monotonic_review")
            }
            ApiError::Scheduler(SchedulerError::InvalidState(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_state")
            }
            ApiError::Scheduler(SchedulerError::InvalidSettings(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "invalid_settings")
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
