//! Recurrence expansion -- turns an RRULE into concrete occurrences.
//!
//! Wraps the `rrule` crate (v0.13) and `chrono-tz`. Recurring events are kept
//! as rules and expanded per query window, so rules without an end keep
//! blocking time indefinitely.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::event::Occurrence;
use crate::interval::TimeInterval;

/// Ceiling for [`Recurrence::expand`]; windowed expansion has none.
pub const MAX_EXPANSION: usize = 10_000;

const ICAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// A recurring event description in local wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    /// RFC 5545 RRULE body, e.g. `FREQ=WEEKLY;BYDAY=MO,WE`.
    pub rrule: String,
    /// First instance, local to `timezone`.
    pub dtstart: NaiveDateTime,
    pub duration_minutes: u32,
    /// IANA timezone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub until: Option<NaiveDateTime>,
    #[serde(default)]
    pub count: Option<u32>,
    /// Local start times to exclude (EXDATE).
    #[serde(default)]
    pub exdates: Vec<NaiveDateTime>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Recurrence {
    pub fn new(
        rrule: impl Into<String>,
        dtstart: NaiveDateTime,
        duration_minutes: u32,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            rrule: rrule.into(),
            dtstart,
            duration_minutes,
            timezone: timezone.into(),
            until: None,
            count: None,
            exdates: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_exdates(mut self, exdates: Vec<NaiveDateTime>) -> Self {
        self.exdates = exdates;
        self
    }

    /// Parse the rule without expanding it.
    ///
    /// # Errors
    /// Same as [`Recurrence::expand`].
    pub fn validate(&self) -> Result<()> {
        self.prepare().map(|_| ())
    }

    /// Expand every instance in chronological order.
    ///
    /// Rules without COUNT or UNTIL never end; use
    /// [`Recurrence::expand_within`] for those.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidRule` if the RRULE is empty or unparseable,
    /// the duration is zero, or the rule yields more than
    /// `MAX_EXPANSION` instances. Returns `SlotError::InvalidTimezone` if the
    /// timezone is not a valid IANA identifier.
    pub fn expand(&self) -> Result<Vec<Occurrence>> {
        let Some((rule_set, duration)) = self.prepare()? else {
            return Ok(Vec::new());
        };

        let mut occurrences = Vec::new();
        for dt in &rule_set {
            if self.count.is_some_and(|c| occurrences.len() >= c as usize) {
                break;
            }
            if occurrences.len() == MAX_EXPANSION {
                return Err(SlotError::InvalidRule(format!(
                    "'{}' yields more than {MAX_EXPANSION} instances",
                    self.rrule
                )));
            }
            let start: DateTime<Utc> = dt.with_timezone(&Utc);
            occurrences.push(Occurrence::new(start, start + duration));
        }

        Ok(occurrences)
    }

    /// Expand only the instances that intersect `window`.
    ///
    /// Iteration stops at the first instance starting at or after the window
    /// end, so unbounded rules are safe here.
    ///
    /// # Errors
    /// Same as [`Recurrence::expand`], minus the instance ceiling.
    pub fn expand_within(&self, window: &TimeInterval) -> Result<Vec<Occurrence>> {
        let Some((rule_set, duration)) = self.prepare()? else {
            return Ok(Vec::new());
        };

        let mut occurrences = Vec::new();
        for (index, dt) in (&rule_set).into_iter().enumerate() {
            if self.count.is_some_and(|c| index >= c as usize) {
                break;
            }
            let start: DateTime<Utc> = dt.with_timezone(&Utc);
            if start >= window.end() {
                break;
            }
            let occurrence = Occurrence::new(start, start + duration);
            if occurrence.intersects(window) {
                occurrences.push(occurrence);
            }
        }

        Ok(occurrences)
    }

    /// Parse into an `RRuleSet`, or `None` when a zero count asks for nothing.
    fn prepare(&self) -> Result<Option<(RRuleSet, Duration)>> {
        if self.rrule.trim().is_empty() {
            return Err(SlotError::InvalidRule("empty RRULE string".to_string()));
        }
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidRule(
                "recurring event duration must be positive".to_string(),
            ));
        }

        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(self.timezone.clone()))?;

        let rule_set: RRuleSet = self
            .to_ical(tz)
            .parse()
            .map_err(|e| SlotError::InvalidRule(format!("{e}")))?;

        if self.count == Some(0) {
            return Ok(None);
        }

        // `limit` only guards against rules that never produce a match.
        let duration = Duration::minutes(i64::from(self.duration_minutes));
        Ok(Some((rule_set.limit(), duration)))
    }

    /// Render the DTSTART/RRULE/EXDATE block understood by the `rrule` crate.
    fn to_ical(&self, tz: Tz) -> String {
        let mut rule = self.rrule.clone();
        let upper = rule.to_uppercase();

        if let Some(c) = self.count {
            if !upper.contains("COUNT=") {
                rule = format!("{rule};COUNT={c}");
            }
        }

        // UNTIL must share DTSTART's zone; UTC needs the trailing `Z`.
        if let Some(until) = self.until {
            if !upper.contains("UNTIL=") {
                let mut until_ical = until.format(ICAL_FORMAT).to_string();
                if tz == Tz::UTC {
                    until_ical.push('Z');
                }
                rule = format!("{rule};UNTIL={until_ical}");
            }
        }

        let mut text = format!(
            "DTSTART;TZID={}:{}\nRRULE:{}",
            tz.name(),
            self.dtstart.format(ICAL_FORMAT),
            rule
        );

        if !self.exdates.is_empty() {
            let exdates: Vec<String> = self
                .exdates
                .iter()
                .map(|d| d.format(ICAL_FORMAT).to_string())
                .collect();
            text.push_str(&format!("\nEXDATE;TZID={}:{}", tz.name(), exdates.join(",")));
        }

        text
    }
}
