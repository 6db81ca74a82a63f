//! Overlap detection for weekly lesson programs and dated meetings.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use super::error::{ScheduleError, ScheduleResult};
use super::interval::{validate_interval, DayKey, TimeInterval, TimeSpan};

fn conflict<K: DayKey>(day: K, requested: TimeSpan<NaiveTime>, existing: TimeSpan<NaiveTime>) -> ScheduleError {
    ScheduleError::ScheduleConflict {
        day: day.to_string(),
        requested,
        existing,
    }
}

/// Check that no two candidates sharing a day-key overlap.
///
/// Candidates are compared by position, so two identical entries collide.
pub fn check_candidates<K: DayKey>(candidates: &[TimeInterval<K>]) -> ScheduleResult<()> {
    if candidates.len() <= 1 {
        return Ok(());
    }

    let mut by_day: BTreeMap<K, Vec<&TimeInterval<K>>> = BTreeMap::new();
    for candidate in candidates {
        by_day.entry(candidate.key).or_default().push(candidate);
    }

    for (day, group) in &by_day {
        for (i, earlier) in group.iter().enumerate() {
            for later in &group[i + 1..] {
                if earlier.span.overlaps(&later.span) {
                    return Err(conflict(*day, later.span, earlier.span));
                }
            }
        }
    }

    Ok(())
}

/// Check every candidate against the subject's committed intervals on the same
/// day-key. Committed intervals are not compared with each other.
pub fn check_against_existing<K: DayKey>(
    existing: &[TimeInterval<K>],
    candidates: &[TimeInterval<K>],
) -> ScheduleResult<()> {
    for candidate in candidates {
        if let Some(hit) = existing.iter().find(|e| e.conflicts_with(candidate)) {
            return Err(conflict(candidate.key, candidate.span, hit.span));
        }
    }
    Ok(())
}

/// Gate for adding `candidates` to a schedule that already holds `existing`:
/// every candidate must be a valid range, free of conflicts with the other
/// candidates and with what is already committed.
pub fn check_assignment<K: DayKey>(
    existing: &[TimeInterval<K>],
    candidates: &[TimeInterval<K>],
) -> ScheduleResult<()> {
    for candidate in candidates {
        validate_interval(candidate.start(), candidate.stop())?;
    }
    check_candidates(candidates)?;
    check_against_existing(existing, candidates)
}

/// Check a proposed meeting slot against one subject's existing meetings.
///
/// `lookup` yields the subject's meetings; only the ones on `date` are
/// compared. A meeting touches several subjects (the advisor and every
/// student), and callers run this once per subject.
pub fn check_subject_on_date<S, F, I>(
    subject: &S,
    date: NaiveDate,
    start: NaiveTime,
    stop: NaiveTime,
    lookup: F,
) -> ScheduleResult<()>
where
    F: FnOnce(&S) -> I,
    I: IntoIterator<Item = TimeInterval<NaiveDate>>,
{
    validate_interval(start, stop)?;
    let requested = TimeSpan::new(start, stop);

    for existing in lookup(subject) {
        if existing.key == date && existing.span.overlaps(&requested) {
            return Err(conflict(date, requested, existing.span));
        }
    }
    Ok(())
}
