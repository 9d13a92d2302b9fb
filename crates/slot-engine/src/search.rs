//! Time-stepped placement search across several calendars.
//!
//! A window of `duration_minutes` slides from `search_start` in steps of
//! `step_minutes`. At each step every calendar is checked in declared order.
//! Results come out sorted by start time, ties broken by calendar order.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

use crate::checker::AvailabilityChecker;
use crate::error::{Result, SlotError};
use crate::interval::TimeInterval;
use crate::provider::CalendarProvider;

pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const DEFAULT_STEP_MINUTES: u32 = 30;
pub const DEFAULT_HORIZON_DAYS: i64 = 100;

/// A calendar and interval considered free by the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementCandidate {
    pub calendar: String,
    pub interval: TimeInterval,
}

/// Parameters for [`find_placements`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Calendar names, in the order ties are broken.
    pub calendars: Vec<String>,
    pub duration_minutes: u32,
    pub search_start: DateTime<Utc>,
    pub search_end: DateTime<Utc>,
    pub max_results: usize,
    pub step_minutes: u32,
}

impl SearchConfig {
    /// A config with the default cap (50), step (30 minutes) and a search end
    /// 100 days after `search_start`, clamped to the last representable instant.
    pub fn new<I, S>(calendars: I, duration_minutes: u32, search_start: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            calendars: calendars.into_iter().map(Into::into).collect(),
            duration_minutes,
            search_start,
            search_end: search_start
                .checked_add_signed(Duration::days(DEFAULT_HORIZON_DAYS))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            max_results: DEFAULT_MAX_RESULTS,
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }

    pub fn with_search_end(mut self, search_end: DateTime<Utc>) -> Self {
        self.search_end = search_end;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    /// # Errors
    /// `SlotError::InvalidConfig` if the duration, step or cap is zero.
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidConfig(
                "event duration must be positive".to_string(),
            ));
        }
        if self.step_minutes == 0 {
            return Err(SlotError::InvalidConfig("step must be positive".to_string()));
        }
        if self.max_results == 0 {
            return Err(SlotError::InvalidConfig(
                "max results must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Collect up to `config.max_results` placements across `config.calendars`.
///
/// The scan stops when the cap is reached or the candidate would end after
/// `search_end`. Fewer results than the cap means the window ran out.
///
/// # Errors
/// `SlotError::InvalidConfig` before scanning starts. Any checker error
/// (unknown calendar, provider failure) aborts the search and no results
/// are returned.
pub fn find_placements<P: CalendarProvider>(
    checker: &AvailabilityChecker<P>,
    config: &SearchConfig,
) -> Result<Vec<PlacementCandidate>> {
    config.validate()?;

    let step = Duration::minutes(i64::from(config.step_minutes));
    let mut candidate = TimeInterval::starting_at(config.search_start, config.duration_minutes)
        .map_err(|_| {
            SlotError::InvalidConfig(format!(
                "a {} minute event at {} ends past the last representable instant",
                config.duration_minutes, config.search_start
            ))
        })?;
    let mut results = Vec::new();
    let mut steps = 0usize;

    while results.len() < config.max_results && candidate.end() <= config.search_end {
        for calendar in &config.calendars {
            if results.len() == config.max_results {
                break;
            }
            if checker.is_placeable(calendar, &candidate)? {
                results.push(PlacementCandidate {
                    calendar: calendar.clone(),
                    interval: candidate,
                });
            }
        }
        steps += 1;
        match candidate.shifted(step) {
            Some(next) => candidate = next,
            None => break,
        }
    }

    info!(
        calendars = config.calendars.len(),
        steps,
        found = results.len(),
        "placement search finished"
    );
    Ok(results)
}
