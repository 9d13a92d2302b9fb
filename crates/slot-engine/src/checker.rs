//! Decide whether a single interval can be placed in a calendar.
//!
//! [`evaluate`] is the pure rule: opening hours first, then conflicts against
//! the supplied occurrences. [`AvailabilityChecker`] wraps it with calendar
//! resolution and occurrence fetching through a [`CalendarProvider`].

use std::fmt;

use chrono::{Duration, Weekday};
use tracing::debug;

use crate::conflict;
use crate::error::Result;
use crate::event::Occurrence;
use crate::hours::OpeningHours;
use crate::interval::TimeInterval;
use crate::provider::{resolve_calendar, CalendarProvider};

/// Default widening of the occurrence query on each side of the interval.
pub const DEFAULT_QUERY_PADDING_HOURS: i64 = 24;

/// Outcome of checking one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Placeable,
    /// The start or end falls on a weekday without opening hours.
    Closed(Weekday),
    /// The start is before opening or the end is after closing.
    OutsideHours,
    /// An existing occurrence overlaps the interval.
    Conflict(Occurrence),
}

impl Verdict {
    pub fn is_placeable(&self) -> bool {
        matches!(self, Verdict::Placeable)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Placeable => write!(f, "placeable"),
            Verdict::Closed(day) => write!(f, "closed on {day}"),
            Verdict::OutsideHours => write!(f, "outside opening hours"),
            Verdict::Conflict(o) => write!(
                f,
                "conflicts with existing event {} - {}",
                o.start.to_rfc3339(),
                o.end.to_rfc3339()
            ),
        }
    }
}

/// Check `interval` against opening hours and existing occurrences.
///
/// The start weekday must be open with `start >= open`, and the end weekday
/// must be open with `end <= close`, each read in the hours' timezone. An
/// interval that crosses midnight is therefore judged against two different
/// days. The first blocking occurrence is reported on conflict.
pub fn evaluate(
    interval: &TimeInterval,
    hours: &OpeningHours,
    occurrences: &[Occurrence],
) -> Verdict {
    let (start_day, start_time) = hours.local(interval.start());
    let (end_day, end_time) = hours.local(interval.end());

    let Some(start_hours) = hours.get(start_day) else {
        return Verdict::Closed(start_day);
    };
    let Some(end_hours) = hours.get(end_day) else {
        return Verdict::Closed(end_day);
    };
    if start_time < start_hours.open || end_time > end_hours.close {
        return Verdict::OutsideHours;
    }

    match occurrences.iter().find(|o| conflict::blocks(interval, o)) {
        Some(occurrence) => Verdict::Conflict(*occurrence),
        None => Verdict::Placeable,
    }
}

/// Checks placements against a provider's calendars under fixed opening hours.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker<P> {
    provider: P,
    hours: OpeningHours,
    query_padding: Duration,
}

impl<P: CalendarProvider> AvailabilityChecker<P> {
    pub fn new(provider: P, hours: OpeningHours) -> Self {
        Self {
            provider,
            hours,
            query_padding: Duration::hours(DEFAULT_QUERY_PADDING_HOURS),
        }
    }

    /// Widen the occurrence query by `padding` on each side of the interval.
    ///
    /// Only the fetch is widened; conflicts are still judged on the exact
    /// interval. Zero is allowed for providers with exact range queries.
    pub fn with_query_padding(mut self, padding: Duration) -> Self {
        self.query_padding = padding;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn opening_hours(&self) -> &OpeningHours {
        &self.hours
    }

    /// Check `interval` in the calendar named `calendar` and report why it
    /// was rejected, if it was.
    ///
    /// # Errors
    /// `SlotError::CalendarNotFound` if the name does not resolve; provider
    /// errors propagate unchanged.
    pub fn check(&self, calendar: &str, interval: &TimeInterval) -> Result<Verdict> {
        let info = resolve_calendar(&self.provider, calendar)?;

        let window = interval.padded(self.query_padding);
        let occurrences = self.provider.list_occurrences(&info.id, &window)?;

        let verdict = evaluate(interval, &self.hours, &occurrences);
        if !verdict.is_placeable() {
            debug!(
                calendar,
                start = %interval.start(),
                end = %interval.end(),
                ?verdict,
                "placement rejected"
            );
        }
        Ok(verdict)
    }

    /// True when `interval` is free and within opening hours in `calendar`.
    ///
    /// # Errors
    /// Same as [`AvailabilityChecker::check`].
    pub fn is_placeable(&self, calendar: &str, interval: &TimeInterval) -> Result<bool> {
        Ok(self.check(calendar, interval)?.is_placeable())
    }
}
