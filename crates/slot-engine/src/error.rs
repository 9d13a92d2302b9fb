//! Error types for slot-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// A calendar name did not resolve against the provider's calendar list.
    #[error("Unknown calendar: {0}")]
    CalendarNotFound(String),

    /// The calendar provider could not be reached or refused the request.
    #[error("Calendar provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),

    #[error("Invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A calendar feed failed validation at the provider boundary.
    #[error("Invalid calendar feed: {0}")]
    InvalidFeed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
