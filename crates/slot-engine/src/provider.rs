//! The calendar provider seam.
//!
//! The engine never talks to a remote calendar service directly. Everything
//! it needs comes through two blocking operations on [`CalendarProvider`]:
//! listing calendars and listing occurrences within a window. Authentication,
//! query construction and transport live in the implementation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::event::Occurrence;
use crate::interval::TimeInterval;

/// A calendar as known to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    /// Provider-specific identifier, opaque to the engine.
    pub id: String,
    /// Human-readable name, used for lookups.
    pub name: String,
}

impl CalendarInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Source of calendars and their occurrences.
pub trait CalendarProvider {
    /// List all calendars visible to the provider, in provider order.
    ///
    /// # Errors
    /// `SlotError::ProviderUnavailable` on transport or auth failure.
    fn list_calendars(&self) -> Result<Vec<CalendarInfo>>;

    /// List every occurrence in calendar `id` that intersects `window`,
    /// including the expanded instances of recurring events.
    ///
    /// # Errors
    /// `SlotError::ProviderUnavailable` or `SlotError::CalendarNotFound`.
    fn list_occurrences(&self, id: &str, window: &TimeInterval) -> Result<Vec<Occurrence>>;
}

impl<P: CalendarProvider + ?Sized> CalendarProvider for &P {
    fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        (**self).list_calendars()
    }

    fn list_occurrences(&self, id: &str, window: &TimeInterval) -> Result<Vec<Occurrence>> {
        (**self).list_occurrences(id, window)
    }
}

/// Resolve a calendar by exact display name.
///
/// # Errors
/// `SlotError::CalendarNotFound` if no calendar carries that name, or any
/// error from [`CalendarProvider::list_calendars`].
pub fn resolve_calendar<P: CalendarProvider + ?Sized>(
    provider: &P,
    name: &str,
) -> Result<CalendarInfo> {
    provider
        .list_calendars()?
        .into_iter()
        .find(|calendar| calendar.name == name)
        .ok_or_else(|| SlotError::CalendarNotFound(name.to_string()))
}
