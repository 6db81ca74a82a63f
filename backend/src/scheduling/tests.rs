use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

use super::*;
use crate::models::Day;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn slot(day: Day, start: (u32, u32), stop: (u32, u32)) -> TimeInterval<Day> {
    TimeInterval::new(day, t(start.0, start.1), t(stop.0, stop.1)).unwrap()
}

fn minutes(m: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(m * 60, 0).unwrap()
}

// ==================== validate_interval ====================

#[test]
fn test_validate_interval_rejects_equal_bounds() {
    let err = validate_interval(t(9, 0), t(9, 0)).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::InvalidRange {
            start: t(9, 0),
            stop: t(9, 0)
        }
    );
}

#[test]
fn test_validate_interval_rejects_inverted_bounds() {
    assert!(validate_interval(t(11, 0), t(10, 0)).is_err());
    assert!(validate_interval(t(10, 0), t(11, 0)).is_ok());
}

#[test]
fn test_interval_new_validates() {
    assert!(TimeInterval::new(Day::Monday, t(10, 0), t(9, 0)).is_err());
    let unchecked = TimeInterval::unchecked(Day::Monday, t(10, 0), t(9, 0));
    assert_eq!(unchecked.start(), t(10, 0));
}

// ==================== candidates among themselves ====================

#[test]
fn test_empty_and_single_candidate_sets_pass() {
    let empty: Vec<TimeInterval<Day>> = vec![];
    assert!(check_candidates(&empty).is_ok());
    assert!(check_candidates(&[slot(Day::Monday, (9, 0), (10, 0))]).is_ok());
}

#[test]
fn test_duplicate_candidates_conflict() {
    let candidates = [
        slot(Day::Tuesday, (9, 0), (10, 0)),
        slot(Day::Tuesday, (9, 0), (10, 0)),
    ];
    let err = check_assignment(&[], &candidates).unwrap_err();
    assert!(err.is_conflict());
}

#[test]
fn test_candidates_on_different_days_do_not_conflict() {
    let candidates = [
        slot(Day::Monday, (9, 0), (10, 0)),
        slot(Day::Tuesday, (9, 0), (10, 0)),
        slot(Day::Wednesday, (9, 30), (10, 30)),
    ];
    assert!(check_candidates(&candidates).is_ok());
}

#[test]
fn test_candidate_conflict_reports_day_and_spans() {
    let candidates = [
        slot(Day::Friday, (13, 0), (15, 0)),
        slot(Day::Friday, (14, 0), (16, 0)),
    ];
    match check_candidates(&candidates).unwrap_err() {
        ScheduleError::ScheduleConflict {
            day,
            requested,
            existing,
        } => {
            assert_eq!(day, "FRIDAY");
            assert_eq!(requested.to_string(), "14:00-16:00");
            assert_eq!(existing.to_string(), "13:00-15:00");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_conflict_found_in_later_group() {
    let candidates = [
        slot(Day::Monday, (8, 0), (9, 0)),
        slot(Day::Thursday, (10, 0), (12, 0)),
        slot(Day::Monday, (9, 0), (10, 0)),
        slot(Day::Thursday, (11, 0), (11, 30)),
    ];
    assert!(check_candidates(&candidates).unwrap_err().is_conflict());
}

// ==================== candidates against existing ====================

#[test]
fn test_adjacent_interval_is_not_a_conflict() {
    let existing = [slot(Day::Monday, (9, 0), (10, 0))];
    let candidates = [slot(Day::Monday, (10, 0), (11, 0))];
    assert!(check_assignment(&existing, &candidates).is_ok());

    let candidates = [slot(Day::Monday, (8, 0), (9, 0))];
    assert!(check_assignment(&existing, &candidates).is_ok());
}

#[test]
fn test_contained_candidate_conflicts_with_existing() {
    let existing = [slot(Day::Monday, (9, 0), (11, 0))];
    let candidates = [slot(Day::Monday, (9, 30), (10, 30))];
    assert!(check_against_existing(&existing, &candidates)
        .unwrap_err()
        .is_conflict());
}

#[test]
fn test_candidate_containing_existing_conflicts() {
    let existing = [slot(Day::Monday, (9, 30), (10, 30))];
    let candidates = [slot(Day::Monday, (9, 0), (11, 0))];
    assert!(check_against_existing(&existing, &candidates).is_err());
}

#[test]
fn test_existing_intervals_are_not_compared_with_each_other() {
    // Overlapping committed data is not this check's concern.
    let existing = [
        slot(Day::Monday, (9, 0), (11, 0)),
        slot(Day::Monday, (10, 0), (12, 0)),
    ];
    let candidates = [slot(Day::Tuesday, (9, 0), (10, 0))];
    assert!(check_assignment(&existing, &candidates).is_ok());
}

#[test]
fn test_assignment_rejects_invalid_candidate_before_comparing() {
    let existing = [slot(Day::Monday, (9, 0), (10, 0))];
    let candidates = [TimeInterval::unchecked(Day::Monday, t(9, 0), t(9, 0))];
    assert!(matches!(
        check_assignment(&existing, &candidates),
        Err(ScheduleError::InvalidRange { .. })
    ));
}

#[test]
fn test_assignment_checks_self_conflict_with_empty_existing() {
    let candidates = [
        slot(Day::Monday, (9, 0), (10, 0)),
        slot(Day::Monday, (9, 45), (10, 15)),
    ];
    assert!(check_assignment(&[], &candidates).is_err());
}

// ==================== meetings on a date ====================

#[test]
fn test_meeting_overlapping_same_date_conflicts() {
    let existing = vec![TimeInterval::unchecked(date(2024, 5, 1), t(10, 30), t(11, 30))];
    let result = check_subject_on_date(&"teacher", date(2024, 5, 1), t(10, 0), t(11, 0), |_| {
        existing.iter().copied()
    });
    assert!(result.unwrap_err().is_conflict());
}

#[test]
fn test_meeting_on_different_date_passes() {
    let existing = vec![TimeInterval::unchecked(date(2024, 5, 1), t(10, 0), t(11, 0))];
    let result = check_subject_on_date(&"teacher", date(2024, 5, 2), t(10, 0), t(11, 0), |_| {
        existing.iter().copied()
    });
    assert!(result.is_ok());
}

#[test]
fn test_meeting_lookup_receives_subject() {
    let mut seen = None;
    let _ = check_subject_on_date(&42_i64, date(2024, 5, 1), t(8, 0), t(9, 0), |subject| {
        seen = Some(*subject);
        Vec::<TimeInterval<NaiveDate>>::new()
    });
    assert_eq!(seen, Some(42));
}

#[test]
fn test_meeting_invalid_range_is_rejected_without_lookup() {
    let mut called = false;
    let result = check_subject_on_date(&1, date(2024, 5, 1), t(9, 0), t(8, 0), |_| {
        called = true;
        Vec::<TimeInterval<NaiveDate>>::new()
    });
    assert!(matches!(result, Err(ScheduleError::InvalidRange { .. })));
    assert!(!called);
}

// ==================== properties ====================

fn span_strategy() -> impl Strategy<Value = TimeSpan<NaiveTime>> {
    (0u32..1380, 1u32..60).prop_map(|(start, len)| TimeSpan::new(minutes(start), minutes(start + len)))
}

fn day_strategy() -> impl Strategy<Value = Day> {
    prop::sample::select(Day::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_validate_interval_matches_ordering(a in 0u32..1440, b in 0u32..1440) {
        let result = validate_interval(minutes(a), minutes(b));
        prop_assert_eq!(result.is_ok(), a < b);
    }

    #[test]
    fn prop_overlap_is_symmetric(a in span_strategy(), b in span_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn prop_overlap_matches_half_open_intersection(a in span_strategy(), b in span_strategy()) {
        let intersects = a.start < b.stop && b.start < a.stop;
        prop_assert_eq!(a.overlaps(&b), intersects);
    }

    #[test]
    fn prop_small_sets_never_conflict(day in day_strategy(), span in span_strategy(), single in any::<bool>()) {
        let candidates: Vec<TimeInterval<Day>> = if single {
            vec![TimeInterval { key: day, span }]
        } else {
            vec![]
        };
        prop_assert!(check_candidates(&candidates).is_ok());
        prop_assert!(check_against_existing(&[], &candidates).is_ok());
        prop_assert!(check_against_existing(&candidates, &[]).is_ok());
    }

    #[test]
    fn prop_equal_starts_conflict(day in day_strategy(), start in 0u32..1380, len_a in 1u32..60, len_b in 1u32..60) {
        let a = TimeInterval::unchecked(day, minutes(start), minutes(start + len_a));
        let b = TimeInterval::unchecked(day, minutes(start), minutes(start + len_b));
        prop_assert!(check_candidates(&[a, b]).is_err());
        prop_assert!(check_against_existing(&[a], &[b]).is_err());
    }

    #[test]
    fn prop_equal_stops_conflict(day in day_strategy(), stop in 60u32..1439, len_a in 1u32..60, len_b in 1u32..60) {
        let a = TimeInterval::unchecked(day, minutes(stop - len_a), minutes(stop));
        let b = TimeInterval::unchecked(day, minutes(stop - len_b), minutes(stop));
        prop_assert!(check_candidates(&[a, b]).is_err());
        prop_assert!(check_against_existing(&[b], &[a]).is_err());
    }

    #[test]
    fn prop_nested_intervals_conflict(day in day_strategy(), start in 0u32..1300, pad_start in 1u32..30, inner in 1u32..30, pad_stop in 1u32..30) {
        let outer = TimeInterval::unchecked(day, minutes(start), minutes(start + pad_start + inner + pad_stop));
        let nested = TimeInterval::unchecked(day, minutes(start + pad_start), minutes(start + pad_start + inner));
        prop_assert!(check_against_existing(&[outer], &[nested]).is_err());
        prop_assert!(check_against_existing(&[nested], &[outer]).is_err());
        prop_assert!(check_candidates(&[nested, outer]).is_err());
    }

    #[test]
    fn prop_different_days_never_conflict(a in span_strategy(), b in span_strategy(), d1 in day_strategy(), d2 in day_strategy()) {
        prop_assume!(d1 != d2);
        let first = TimeInterval { key: d1, span: a };
        let second = TimeInterval { key: d2, span: b };
        prop_assert!(check_candidates(&[first, second]).is_ok());
        prop_assert!(check_against_existing(&[first], &[second]).is_ok());
    }

    #[test]
    fn prop_order_does_not_change_outcome(spans in prop::collection::vec((day_strategy(), span_strategy()), 0..6)) {
        let forward: Vec<TimeInterval<Day>> = spans.iter().map(|(key, span)| TimeInterval { key: *key, span: *span }).collect();
        let mut backward = forward.clone();
        backward.reverse();
        prop_assert_eq!(check_candidates(&forward).is_ok(), check_candidates(&backward).is_ok());
    }
}
