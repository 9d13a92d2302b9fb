//! Shared fixtures: three calendars, Mon-Fri 06:00-18:00 in Europe/Berlin.

#![allow(dead_code)]

use std::cell::Cell;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use slot_engine::{
    CalendarEvent, CalendarInfo, CalendarProvider, InMemoryProvider, Occurrence, OpeningHours,
    SlotError, TimeInterval,
};

/// Parse an RFC 3339 timestamp into UTC.
pub fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn interval(start: &str, end: &str) -> TimeInterval {
    TimeInterval::new(ts(start), ts(end)).unwrap()
}

pub fn occurrence(start: &str, end: &str) -> Occurrence {
    Occurrence::new(ts(start), ts(end))
}

pub fn business_hours() -> OpeningHours {
    OpeningHours::weekdays(
        Tz::Europe__Berlin,
        NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    )
    .unwrap()
}

/// "Cal #1" has a meeting on Friday 2012-02-03 08:00-09:00 (+01:00), a second
/// one 10:00-11:00 and a recurring 13:00-14:00 on three consecutive days.
/// "Cal #2" and "Cal #3" are empty.
pub fn provider() -> InMemoryProvider {
    let mut provider = InMemoryProvider::new()
        .with_calendar("http://calendar.example.com/cal1", "Cal #1")
        .and_then(|p| p.with_calendar("http://calendar.example.com/cal2", "Cal #2"))
        .and_then(|p| p.with_calendar("http://calendar.example.com/cal3", "Cal #3"))
        .unwrap();

    provider
        .add_event(
            "Cal #1",
            CalendarEvent::single(
                "Test Event #1 in Calendar #1",
                interval("2012-02-03T08:00:00+01:00", "2012-02-03T09:00:00+01:00"),
            ),
        )
        .unwrap();
    provider
        .add_event(
            "Cal #1",
            CalendarEvent::single(
                "Test Event #2 in Calendar #1",
                interval("2012-02-03T10:00:00+01:00", "2012-02-03T11:00:00+01:00"),
            ),
        )
        .unwrap();
    provider
        .add_event(
            "Cal #1",
            CalendarEvent::new(
                "Test Event #3 (recurring) in Calendar #1",
                vec![
                    occurrence("2012-02-02T13:00:00+01:00", "2012-02-02T14:00:00+01:00"),
                    occurrence("2012-02-03T13:00:00+01:00", "2012-02-03T14:00:00+01:00"),
                    occurrence("2012-02-06T13:00:00+01:00", "2012-02-06T14:00:00+01:00"),
                ],
            ),
        )
        .unwrap();

    provider
}

/// A provider whose transport is down.
#[derive(Debug, Default)]
pub struct UnavailableProvider;

impl CalendarProvider for UnavailableProvider {
    fn list_calendars(&self) -> slot_engine::error::Result<Vec<CalendarInfo>> {
        Err(SlotError::ProviderUnavailable("connection refused".to_string()))
    }

    fn list_occurrences(
        &self,
        _id: &str,
        _window: &TimeInterval,
    ) -> slot_engine::error::Result<Vec<Occurrence>> {
        Err(SlotError::ProviderUnavailable("connection refused".to_string()))
    }
}

/// Wraps a provider and records the windows it was queried with.
#[derive(Debug)]
pub struct RecordingProvider<P> {
    pub inner: P,
    pub last_window: Cell<Option<TimeInterval>>,
    pub occurrence_calls: Cell<usize>,
}

impl<P> RecordingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last_window: Cell::new(None),
            occurrence_calls: Cell::new(0),
        }
    }
}

impl<P: CalendarProvider> CalendarProvider for RecordingProvider<P> {
    fn list_calendars(&self) -> slot_engine::error::Result<Vec<CalendarInfo>> {
        self.inner.list_calendars()
    }

    fn list_occurrences(
        &self,
        id: &str,
        window: &TimeInterval,
    ) -> slot_engine::error::Result<Vec<Occurrence>> {
        self.last_window.set(Some(*window));
        self.occurrence_calls.set(self.occurrence_calls.get() + 1);
        self.inner.list_occurrences(id, window)
    }
}
