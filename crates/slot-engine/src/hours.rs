//! Per-weekday opening hours.
//!
//! Times of day are interpreted in the timezone attached to the
//! [`OpeningHours`], so a `06:00` opening in `Europe/Berlin` means 06:00 local
//! wall-clock time regardless of how the instants themselves are stored.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};

/// The permitted time-of-day range for a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayHours {
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if `close` is not after `open`.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self> {
        if close <= open {
            return Err(SlotError::InvalidConfig(format!(
                "closing time {close} must be after opening time {open}"
            )));
        }
        Ok(Self { open, close })
    }
}

/// Weekday → opening hours. A weekday without an entry is closed all day.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningHours {
    days: [Option<DayHours>; 7],
    timezone: Tz,
}

impl Default for OpeningHours {
    fn default() -> Self {
        Self::closed(Tz::UTC)
    }
}

impl OpeningHours {
    /// Opening hours with every weekday closed.
    pub fn closed(timezone: Tz) -> Self {
        Self {
            days: [None; 7],
            timezone,
        }
    }

    /// Monday to Friday open between `open` and `close`, weekends closed.
    pub fn weekdays(timezone: Tz, open: NaiveTime, close: NaiveTime) -> Result<Self> {
        let hours = DayHours::new(open, close)?;
        let mut opening = Self::closed(timezone);
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            opening.set(day, hours);
        }
        Ok(opening)
    }

    /// Builder variant of [`OpeningHours::set`].
    pub fn with_day(mut self, day: Weekday, hours: DayHours) -> Self {
        self.set(day, hours);
        self
    }

    pub fn set(&mut self, day: Weekday, hours: DayHours) {
        self.days[day.num_days_from_monday() as usize] = Some(hours);
    }

    pub fn close_day(&mut self, day: Weekday) {
        self.days[day.num_days_from_monday() as usize] = None;
    }

    pub fn get(&self, day: Weekday) -> Option<DayHours> {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Local weekday and time of day of `instant` in this schedule's timezone.
    pub fn local(&self, instant: DateTime<Utc>) -> (Weekday, NaiveTime) {
        let local = instant.with_timezone(&self.timezone);
        (local.weekday(), local.time())
    }
}
