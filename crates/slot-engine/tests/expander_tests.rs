//! Tests for recurrence expansion into occurrences.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use slot_engine::{Recurrence, SlotError, TimeInterval};

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Basic rules
// ---------------------------------------------------------------------------

#[test]
fn daily_count_in_rule() {
    let result = Recurrence::new("FREQ=DAILY;COUNT=5", local(2026, 3, 2, 9, 0), 30, "UTC")
        .expand()
        .expect("should expand successfully");

    assert_eq!(result.len(), 5);
    for (i, occurrence) in result.iter().enumerate() {
        let day = 2 + i as u32;
        assert_eq!(
            occurrence.start,
            Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
        );
        assert_eq!(
            occurrence.end,
            Utc.with_ymd_and_hms(2026, 3, day, 9, 30, 0).unwrap()
        );
    }
}

#[test]
fn weekly_byday_with_external_count() {
    let result = Recurrence::new("FREQ=WEEKLY;BYDAY=MO,WE,FR", local(2026, 3, 2, 10, 0), 45, "UTC")
        .with_count(4)
        .expand()
        .unwrap();

    let days: Vec<u32> = result
        .iter()
        .map(|o| chrono::Datelike::day(&o.start))
        .collect();
    assert_eq!(days, vec![2, 4, 6, 9]);
}

#[test]
fn until_bounds_expansion() {
    let result = Recurrence::new("FREQ=DAILY", local(2026, 3, 2, 9, 0), 60, "UTC")
        .with_until(local(2026, 3, 4, 9, 0))
        .expand()
        .unwrap();
    assert_eq!(result.len(), 3);
}

#[test]
fn exdates_are_removed() {
    let result = Recurrence::new("FREQ=DAILY", local(2026, 3, 2, 9, 0), 60, "UTC")
        .with_until(local(2026, 3, 5, 9, 0))
        .with_exdates(vec![local(2026, 3, 3, 9, 0)])
        .expand()
        .unwrap();

    let starts: Vec<_> = result.iter().map(|o| o.start).collect();
    assert_eq!(
        starts,
        vec![
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap(),
        ]
    );
}

#[test]
fn count_zero_yields_nothing() {
    let result = Recurrence::new("FREQ=DAILY", local(2026, 3, 2, 9, 0), 60, "UTC")
        .with_count(0)
        .expand()
        .unwrap();
    assert!(result.is_empty());
}

// ---------------------------------------------------------------------------
// Long-running rules
// ---------------------------------------------------------------------------

#[test]
fn large_count_in_rule_is_honoured() {
    let result = Recurrence::new("FREQ=DAILY;COUNT=600", local(2011, 1, 3, 9, 0), 60, "UTC")
        .expand()
        .unwrap();

    assert_eq!(result.len(), 600);
    let last = Utc.with_ymd_and_hms(2011, 1, 3, 9, 0, 0).unwrap() + chrono::Duration::days(599);
    assert_eq!(result[599].start, last);
}

#[test]
fn unbounded_rule_cannot_be_fully_expanded() {
    let err = Recurrence::new("FREQ=DAILY", local(2011, 1, 3, 9, 0), 60, "UTC")
        .expand()
        .unwrap_err();
    assert!(matches!(err, SlotError::InvalidRule(_)));
}

#[test]
fn unbounded_rule_expands_within_distant_window() {
    let window = TimeInterval::new(
        Utc.with_ymd_and_hms(2012, 6, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2012, 6, 3, 0, 0, 0).unwrap(),
    )
    .unwrap();
    let result = Recurrence::new("FREQ=DAILY", local(2011, 1, 3, 9, 0), 60, "UTC")
        .expand_within(&window)
        .unwrap();

    let starts: Vec<_> = result.iter().map(|o| o.start).collect();
    assert_eq!(
        starts,
        vec![
            Utc.with_ymd_and_hms(2012, 6, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2012, 6, 2, 9, 0, 0).unwrap(),
        ]
    );
}

#[test]
fn windowed_expansion_respects_count() {
    let window = TimeInterval::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
    )
    .unwrap();
    let result = Recurrence::new("FREQ=DAILY", local(2026, 3, 2, 9, 0), 60, "UTC")
        .with_count(3)
        .expand_within(&window)
        .unwrap();
    assert_eq!(result.len(), 3);
}

#[test]
fn windowed_expansion_keeps_instance_straddling_window_start() {
    let window = TimeInterval::new(
        Utc.with_ymd_and_hms(2026, 3, 3, 9, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 3, 12, 0, 0).unwrap(),
    )
    .unwrap();
    let result = Recurrence::new("FREQ=DAILY", local(2026, 3, 2, 9, 0), 60, "UTC")
        .expand_within(&window)
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].start, Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap());
}

// ---------------------------------------------------------------------------
// Timezones
// ---------------------------------------------------------------------------

#[test]
fn dst_transition_keeps_local_time() {
    // Feb is PST (UTC-8), Mar is PDT (UTC-7) after spring forward on Mar 8.
    let result = Recurrence::new(
        "FREQ=MONTHLY;BYDAY=TU;BYSETPOS=3",
        local(2026, 2, 17, 14, 0),
        60,
        "America/Los_Angeles",
    )
    .with_count(2)
    .expand()
    .unwrap();

    assert_eq!(result[0].start.hour(), 22);
    assert_eq!(result[1].start.hour(), 21);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn empty_rule_is_invalid() {
    let err = Recurrence::new("", local(2026, 3, 2, 9, 0), 60, "UTC")
        .expand()
        .unwrap_err();
    assert!(matches!(err, SlotError::InvalidRule(_)));
}

#[test]
fn garbage_rule_is_invalid() {
    let err = Recurrence::new("FREQ=SOMETIMES", local(2026, 3, 2, 9, 0), 60, "UTC")
        .expand()
        .unwrap_err();
    assert!(matches!(err, SlotError::InvalidRule(_)));
}

#[test]
fn zero_duration_is_invalid() {
    let err = Recurrence::new("FREQ=DAILY;COUNT=2", local(2026, 3, 2, 9, 0), 0, "UTC")
        .expand()
        .unwrap_err();
    assert!(matches!(err, SlotError::InvalidRule(_)));
}

#[test]
fn unknown_timezone_is_invalid() {
    let err = Recurrence::new("FREQ=DAILY;COUNT=2", local(2026, 3, 2, 9, 0), 60, "Mars/Olympus")
        .expand()
        .unwrap_err();
    assert!(matches!(err, SlotError::InvalidTimezone(tz) if tz == "Mars/Olympus"));
}
