//! Calendar events and their concrete occurrences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expander::Recurrence;
use crate::interval::TimeInterval;

/// One concrete time span of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Occurrence {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True when the occurrence shares at least one instant with `window`.
    pub fn intersects(&self, window: &TimeInterval) -> bool {
        self.start < window.end() && self.end > window.start()
    }
}

impl From<TimeInterval> for Occurrence {
    fn from(interval: TimeInterval) -> Self {
        Self {
            start: interval.start(),
            end: interval.end(),
        }
    }
}

/// A calendar entry: explicit occurrences plus an optional recurrence rule.
///
/// The rule is kept unexpanded and only turned into occurrences for a
/// query window, see [`CalendarEvent::occurrences_within`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, occurrences: Vec<Occurrence>) -> Self {
        Self {
            title: title.into(),
            occurrences,
            recurrence: None,
        }
    }

    /// A one-off event with a single occurrence.
    pub fn single(title: impl Into<String>, interval: TimeInterval) -> Self {
        Self::new(title, vec![interval.into()])
    }

    /// An event driven by a recurrence rule.
    pub fn recurring(title: impl Into<String>, recurrence: Recurrence) -> Self {
        Self {
            title: title.into(),
            occurrences: Vec::new(),
            recurrence: Some(recurrence),
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some() || self.occurrences.len() > 1
    }

    /// Occurrences intersecting `window`, explicit ones first, then expanded
    /// instances of the rule.
    ///
    /// # Errors
    /// Expansion errors from the recurrence rule.
    pub fn occurrences_within(&self, window: &TimeInterval) -> Result<Vec<Occurrence>> {
        let mut occurrences: Vec<Occurrence> = self
            .occurrences
            .iter()
            .copied()
            .filter(|o| o.intersects(window))
            .collect();
        if let Some(recurrence) = &self.recurrence {
            occurrences.extend(recurrence.expand_within(window)?);
        }
        Ok(occurrences)
    }
}
