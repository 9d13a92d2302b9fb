//! TOML configuration for opening hours and search defaults.
//!
//! ```toml
//! timezone = "Europe/Berlin"
//!
//! [opening_hours]
//! mon = { open = "06:00", close = "18:00" }
//! tue = { open = "06:00", close = "18:00" }
//!
//! [search]
//! max_results = 20
//! step_minutes = 15
//! horizon_days = 30
//! query_padding_hours = 24
//! ```
//!
//! Every key is optional. Without `[opening_hours]` every day is closed.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::checker::DEFAULT_QUERY_PADDING_HOURS;
use crate::error::{Result, SlotError};
use crate::hours::{DayHours, OpeningHours};
use crate::search::{
    SearchConfig, DEFAULT_HORIZON_DAYS, DEFAULT_MAX_RESULTS, DEFAULT_STEP_MINUTES,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlotConfig {
    /// IANA timezone in which opening hours are read.
    pub timezone: String,
    /// Weekday (`mon`, `tuesday`, ...) → hours.
    pub opening_hours: BTreeMap<String, HoursSetting>,
    pub search: SearchSettings,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            opening_hours: BTreeMap::new(),
            search: SearchSettings::default(),
        }
    }
}

/// Opening and closing time as `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoursSetting {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    pub max_results: usize,
    pub step_minutes: u32,
    pub horizon_days: u32,
    pub query_padding_hours: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            step_minutes: DEFAULT_STEP_MINUTES,
            horizon_days: DEFAULT_HORIZON_DAYS as u32,
            query_padding_hours: DEFAULT_QUERY_PADDING_HOURS as u32,
        }
    }
}

impl SlotConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// `SlotError::Config` on malformed TOML, unknown weekdays, unparseable or
    /// inverted times, or zero search settings. `SlotError::InvalidTimezone`
    /// for an unknown timezone.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SlotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SlotError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.opening_hours()?;
        let search = &self.search;
        if search.max_results == 0 || search.step_minutes == 0 || search.horizon_days == 0 {
            return Err(SlotError::Config(
                "search.max_results, search.step_minutes and search.horizon_days must be positive"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(self.timezone.clone()))
    }

    /// Build [`OpeningHours`] from the `[opening_hours]` table.
    pub fn opening_hours(&self) -> Result<OpeningHours> {
        let mut hours = OpeningHours::closed(self.timezone()?);
        for (day, setting) in &self.opening_hours {
            let weekday: Weekday = day
                .parse()
                .map_err(|_| SlotError::Config(format!("unknown weekday '{day}'")))?;
            let open = parse_time(&setting.open)?;
            let close = parse_time(&setting.close)?;
            let day_hours = DayHours::new(open, close)
                .map_err(|_| SlotError::Config(format!("{day}: close must be after open")))?;
            hours.set(weekday, day_hours);
        }
        Ok(hours)
    }

    pub fn query_padding(&self) -> Duration {
        Duration::hours(i64::from(self.search.query_padding_hours))
    }

    /// A [`SearchConfig`] seeded with this file's search defaults.
    pub fn search_config<I, S>(
        &self,
        calendars: I,
        duration_minutes: u32,
        search_start: DateTime<Utc>,
    ) -> SearchConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let horizon = Duration::days(i64::from(self.search.horizon_days));
        let search_end = search_start
            .checked_add_signed(horizon)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        SearchConfig::new(calendars, duration_minutes, search_start)
            .with_search_end(search_end)
            .with_max_results(self.search.max_results)
            .with_step_minutes(self.search.step_minutes)
    }
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .map_err(|_| SlotError::Config(format!("invalid time of day '{text}', expected HH:MM")))
}
