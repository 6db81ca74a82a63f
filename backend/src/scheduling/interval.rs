//! Time spans and day-keyed intervals.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::error::{ScheduleError, ScheduleResult};
use crate::models::time::CLOCK_FORMAT;

/// Grouping key that scopes conflict checks: a calendar date for meetings,
/// a weekday for lesson programs.
pub trait DayKey: Ord + Copy + fmt::Display {}

impl<T> DayKey for T where T: Ord + Copy + fmt::Display {}

/// A `[start, stop)` range over any ordered bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan<T> {
    pub start: T,
    pub stop: T,
}

impl<T: Ord + Copy> TimeSpan<T> {
    pub fn new(start: T, stop: T) -> Self {
        Self { start, stop }
    }

    /// Whether the two spans collide. Back-to-back spans (one stops exactly
    /// when the other starts) do not.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.collides_from(other) || other.collides_from(self)
    }

    /// The overlap rules evaluated from `self`'s side. `overlaps` applies them
    /// in both directions so nesting is caught whichever span is outer.
    fn collides_from(&self, other: &Self) -> bool {
        self.start == other.start
            || self.stop == other.stop
            || (self.start < other.start && other.start < self.stop)
            || (self.start < other.stop && other.stop < self.stop)
            || (self.start < other.start && other.stop < self.stop)
    }
}

impl fmt::Display for TimeSpan<NaiveTime> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(CLOCK_FORMAT),
            self.stop.format(CLOCK_FORMAT)
        )
    }
}

/// A clock-time span pinned to a day-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval<K> {
    pub key: K,
    pub span: TimeSpan<NaiveTime>,
}

impl<K: DayKey> TimeInterval<K> {
    /// Build an interval, rejecting zero-length and inverted ranges.
    pub fn new(key: K, start: NaiveTime, stop: NaiveTime) -> ScheduleResult<Self> {
        validate_interval(start, stop)?;
        Ok(Self::unchecked(key, start, stop))
    }

    /// Build an interval from data that was validated when it was committed.
    pub fn unchecked(key: K, start: NaiveTime, stop: NaiveTime) -> Self {
        Self {
            key,
            span: TimeSpan::new(start, stop),
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.span.start
    }

    pub fn stop(&self) -> NaiveTime {
        self.span.stop
    }

    /// Same day-key and overlapping spans.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.key == other.key && self.span.overlaps(&other.span)
    }
}

/// Reject intervals whose start is not strictly before their stop.
pub fn validate_interval(start: NaiveTime, stop: NaiveTime) -> ScheduleResult<()> {
    if start >= stop {
        return Err(ScheduleError::InvalidRange { start, stop });
    }
    Ok(())
}
