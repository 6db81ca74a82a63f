//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::scheduling::ScheduleError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Duplicate or otherwise clashing data
    Conflict(String),
    /// Missing or invalid bearer token
    Unauthorized(String),
    /// Authenticated, but not allowed
    Forbidden(String),
    /// Malformed interval or overlapping schedule
    Schedule(ScheduleError),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Schedule(e) if e.is_conflict() => StatusCode::CONFLICT,
            AppError::Schedule(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", msg),
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Conflict(msg) => ApiError::new("CONFLICT", msg),
            AppError::Unauthorized(msg) => ApiError::new("UNAUTHORIZED", msg),
            AppError::Forbidden(msg) => ApiError::new("FORBIDDEN", msg),
            AppError::Schedule(e) => {
                let message = e.to_string();
                match e {
                    ScheduleError::ScheduleConflict { day, existing, .. } => {
                        ApiError::new("SCHEDULE_CONFLICT", message)
                            .with_details(format!("{} {}", day, existing))
                    }
                    ScheduleError::InvalidRange { .. } => ApiError::new("INVALID_RANGE", message),
                }
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ApiError::new("INTERNAL_ERROR", msg)
            }
            AppError::Repository(e) => {
                if e.is_not_found() {
                    ApiError::new("NOT_FOUND", e.to_string())
                } else {
                    error!("Repository error: {}", e);
                    ApiError::new("REPOSITORY_ERROR", e.to_string())
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::BadRequest(msg) => AppError::BadRequest(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::Unauthorized(msg) => AppError::Unauthorized(msg),
            ServiceError::Schedule(e) => AppError::Schedule(e),
            ServiceError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
