//! Half-open time intervals.
//!
//! A [`TimeInterval`] is a `Copy` value: shifting or padding it yields a new
//! interval and never touches the original.

use crate::error::{Result, SlotError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A span of time `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting empty or inverted spans.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidInterval` if `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(SlotError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an interval of `minutes` length beginning at `start`.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidInterval` if `minutes` is zero or the end
    /// falls past the last representable instant.
    pub fn starting_at(start: DateTime<Utc>, minutes: u32) -> Result<Self> {
        let end = start
            .checked_add_signed(Duration::minutes(i64::from(minutes)))
            .ok_or(SlotError::InvalidInterval { start, end: start })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Move both ends by `by`, or `None` if either end would overflow.
    pub fn shifted(&self, by: Duration) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add_signed(by)?,
            end: self.end.checked_add_signed(by)?,
        })
    }

    /// Widen the interval by `by` on each side. A negative `by` is treated as
    /// zero; ends saturate at the representable range.
    pub fn padded(&self, by: Duration) -> Self {
        let by = by.max(Duration::zero());
        Self {
            start: self.start.checked_sub_signed(by).unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: self.end.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// True when the two intervals share at least one instant.
    ///
    /// Intervals that only touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// Decoding goes through `new`, so `end > start` holds for every decoded value.
impl<'de> Deserialize<'de> for TimeInterval {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        }

        let raw = Raw::deserialize(deserializer)?;
        TimeInterval::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
