//! # slot-engine
//!
//! Find free placements for an event across several calendars, within
//! per-weekday opening hours.
//!
//! Calendars are reached through the [`CalendarProvider`] trait, which only
//! needs to list calendars and list occurrences within a window. The engine
//! checks a single interval with [`AvailabilityChecker`] and scans a whole
//! window with [`find_placements`].
//!
//! ## Modules
//!
//! - [`interval`] -- Immutable half-open `TimeInterval`
//! - [`hours`] -- Per-weekday opening hours in a timezone
//! - [`event`] -- Calendar events and occurrences
//! - [`conflict`] -- Occurrence-vs-interval overlap rule
//! - [`checker`] -- Availability check for a single placement
//! - [`search`] -- Time-stepped placement search
//! - [`provider`] -- The calendar provider seam
//! - [`memory`] -- In-memory provider loaded from a JSON feed
//! - [`expander`] -- RRULE → occurrences
//! - [`config`] -- TOML configuration
//! - [`error`] -- Error types

pub mod checker;
pub mod config;
pub mod conflict;
pub mod error;
pub mod event;
pub mod expander;
pub mod hours;
pub mod interval;
pub mod memory;
pub mod provider;
pub mod search;

pub use checker::{evaluate, AvailabilityChecker, Verdict};
pub use config::SlotConfig;
pub use conflict::find_conflicts;
pub use error::SlotError;
pub use event::{CalendarEvent, Occurrence};
pub use expander::Recurrence;
pub use hours::{DayHours, OpeningHours};
pub use interval::TimeInterval;
pub use memory::InMemoryProvider;
pub use provider::{resolve_calendar, CalendarInfo, CalendarProvider};
pub use search::{find_placements, PlacementCandidate, SearchConfig};
