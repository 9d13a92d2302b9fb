//! An in-memory [`CalendarProvider`], optionally loaded from a JSON feed.
//!
//! Feeds are validated on load: every explicit occurrence must have
//! `end > start`, calendar ids must be unique and recurrence rules must
//! parse. Rules stay unexpanded and are only expanded for the window passed
//! to [`CalendarProvider::list_occurrences`].
//!
//! # Feed format
//!
//! ```json
//! {
//!   "calendars": [
//!     {
//!       "id": "cal-1",
//!       "name": "Cal #1",
//!       "events": [
//!         { "title": "Review", "occurrences": [
//!             { "start": "2012-02-03T07:00:00Z", "end": "2012-02-03T08:00:00Z" } ] },
//!         { "title": "Standup", "recurrence": {
//!             "rrule": "FREQ=DAILY;COUNT=5", "dtstart": "2012-02-06T09:00:00",
//!             "duration_minutes": 15, "timezone": "Europe/Berlin" } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::event::{CalendarEvent, Occurrence};
use crate::interval::TimeInterval;
use crate::provider::{CalendarInfo, CalendarProvider};

#[derive(Debug, Clone, PartialEq)]
struct StoredCalendar {
    info: CalendarInfo,
    events: Vec<CalendarEvent>,
}

/// Calendars and events held in memory, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryProvider {
    calendars: Vec<StoredCalendar>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder variant of [`InMemoryProvider::add_calendar`].
    ///
    /// # Errors
    /// Same as [`InMemoryProvider::add_calendar`].
    pub fn with_calendar(mut self, id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        self.add_calendar(CalendarInfo::new(id, name))?;
        Ok(self)
    }

    /// Register an empty calendar.
    ///
    /// # Errors
    /// `SlotError::InvalidFeed` if a calendar with the same id exists.
    pub fn add_calendar(&mut self, info: CalendarInfo) -> Result<()> {
        if self.calendars.iter().any(|c| c.info.id == info.id) {
            return Err(SlotError::InvalidFeed(format!(
                "duplicate calendar id '{}'",
                info.id
            )));
        }
        self.calendars.push(StoredCalendar {
            info,
            events: Vec::new(),
        });
        Ok(())
    }

    /// Attach an event to the calendar named `calendar`.
    ///
    /// # Errors
    /// `SlotError::CalendarNotFound` if no calendar has that name.
    /// `SlotError::InvalidFeed` if an occurrence does not end after it starts.
    /// Rule errors from an unparseable recurrence.
    pub fn add_event(&mut self, calendar: &str, event: CalendarEvent) -> Result<()> {
        validate_event(&event)?;
        let stored = self
            .calendars
            .iter_mut()
            .find(|c| c.info.name == calendar)
            .ok_or_else(|| SlotError::CalendarNotFound(calendar.to_string()))?;
        stored.events.push(event);
        Ok(())
    }

    /// All events of the calendar named `calendar`.
    ///
    /// # Errors
    /// `SlotError::CalendarNotFound` if no calendar has that name.
    pub fn events(&self, calendar: &str) -> Result<&[CalendarEvent]> {
        self.calendars
            .iter()
            .find(|c| c.info.name == calendar)
            .map(|c| c.events.as_slice())
            .ok_or_else(|| SlotError::CalendarNotFound(calendar.to_string()))
    }

    /// Parse and validate a JSON calendar feed.
    ///
    /// # Errors
    /// `SlotError::InvalidFeed` on malformed JSON, duplicate calendar ids or
    /// inverted spans; rule errors from recurring events propagate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let feed: FeedFile =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidFeed(e.to_string()))?;

        let mut provider = Self::new();
        for calendar in feed.calendars {
            for event in &calendar.events {
                validate_event(event)?;
            }

            provider.add_calendar(CalendarInfo::new(calendar.id, calendar.name))?;
            if let Some(stored) = provider.calendars.last_mut() {
                stored.events = calendar.events;
                debug!(
                    calendar = %stored.info.name,
                    events = stored.events.len(),
                    "loaded calendar from feed"
                );
            }
        }

        Ok(provider)
    }

    /// Read a JSON calendar feed from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SlotError::InvalidFeed(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }
}

impl CalendarProvider for InMemoryProvider {
    fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        Ok(self.calendars.iter().map(|c| c.info.clone()).collect())
    }

    fn list_occurrences(&self, id: &str, window: &TimeInterval) -> Result<Vec<Occurrence>> {
        let calendar = self
            .calendars
            .iter()
            .find(|c| c.info.id == id)
            .ok_or_else(|| SlotError::CalendarNotFound(id.to_string()))?;

        let mut occurrences = Vec::new();
        for event in &calendar.events {
            occurrences.extend(event.occurrences_within(window)?);
        }
        occurrences.sort_by_key(|o| (o.start, o.end));

        Ok(occurrences)
    }
}

fn validate_event(event: &CalendarEvent) -> Result<()> {
    if let Some(bad) = event.occurrences.iter().find(|o| o.end <= o.start) {
        return Err(SlotError::InvalidFeed(format!(
            "event '{}' has an occurrence ending at {} before it starts at {}",
            event.title, bad.end, bad.start
        )));
    }
    match &event.recurrence {
        Some(recurrence) => recurrence.validate(),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Feed DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeedFile {
    calendars: Vec<FeedCalendar>,
}

#[derive(Deserialize)]
struct FeedCalendar {
    id: String,
    name: String,
    #[serde(default)]
    events: Vec<CalendarEvent>,
}
