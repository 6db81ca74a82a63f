//! Error type shared by every service function.

use crate::db::repository::RepositoryError;
use crate::scheduling::ScheduleError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Why a service call was refused.
///
/// The variants line up with the HTTP statuses the API answers with; see
/// `crate::http::error` for the mapping.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Whether this is a schedule overlap, as opposed to a malformed range.
    pub fn is_schedule_conflict(&self) -> bool {
        matches!(self, Self::Schedule(e) if e.is_conflict())
    }
}

/// Lookups that miss surface as `NotFound`; everything else stays a
/// repository failure.
impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { message, .. } => Self::NotFound(message),
            other => Self::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    #[test]
    fn test_repository_not_found_becomes_service_not_found() {
        let err: ServiceError = RepositoryError::missing("lesson", 4).into();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "lesson 4 not found"));
    }

    #[test]
    fn test_connection_error_stays_repository_error() {
        let err: ServiceError = RepositoryError::connection("down").into();
        assert!(matches!(err, ServiceError::Repository(_)));
    }

    #[test]
    fn test_invalid_range_is_not_a_schedule_conflict() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let err: ServiceError = ScheduleError::InvalidRange { start: t, stop: t }.into();
        assert!(!err.is_schedule_conflict());
    }
}
