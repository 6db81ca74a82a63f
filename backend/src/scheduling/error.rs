//! Error types for schedule validation.

use chrono::NaiveTime;

use super::interval::TimeSpan;

/// Result type for schedule checks
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Reasons a requested interval is rejected.
///
/// Both variants are client-input errors: retrying the same request yields the
/// same answer, and no persisted state has been touched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Start is not strictly before stop.
    #[error("Invalid time range: start {start} must be before stop {stop}")]
    InvalidRange { start: NaiveTime, stop: NaiveTime },

    /// The requested interval overlaps another one on the same day-key.
    #[error("Schedule conflict on {day}: {requested} overlaps {existing}")]
    ScheduleConflict {
        day: String,
        requested: TimeSpan<NaiveTime>,
        existing: TimeSpan<NaiveTime>,
    },
}

impl ScheduleError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ScheduleError::ScheduleConflict { .. })
    }
}
