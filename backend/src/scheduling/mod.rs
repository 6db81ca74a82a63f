//! Time-interval conflict detection.
//!
//! Two scheduling paths share one overlap predicate:
//!
//! - weekly lesson programs, keyed by [`Day`](crate::models::Day): a student or
//!   teacher adding programs runs [`check_assignment`] against the programs
//!   they already hold;
//! - advisor meetings, keyed by calendar date: every subject a meeting touches
//!   (the advisor and each student) is checked with [`check_subject_on_date`].
//!
//! All checks are pure and synchronous. They borrow their inputs and never
//! write anything; callers must hold the per-subject schedule lock
//! (see [`ScheduleLocking`](crate::db::repository::ScheduleLocking)) between
//! reading the existing intervals and committing, otherwise two concurrent
//! requests can both pass against the same stale snapshot.

pub mod conflict;
pub mod error;
pub mod interval;

#[cfg(test)]
mod tests;

pub use conflict::{check_against_existing, check_assignment, check_candidates, check_subject_on_date};
pub use error::{ScheduleError, ScheduleResult};
pub use interval::{validate_interval, DayKey, TimeInterval, TimeSpan};
