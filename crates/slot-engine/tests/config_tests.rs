//! Tests for TOML configuration.

use chrono::{Duration, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use slot_engine::{SlotConfig, SlotError};

const CONFIG: &str = r#"
timezone = "Europe/Berlin"

[opening_hours]
mon = { open = "06:00", close = "18:00" }
friday = { open = "08:30", close = "12:00" }

[search]
max_results = 10
step_minutes = 15
horizon_days = 7
query_padding_hours = 0
"#;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn empty_config_uses_defaults() {
    let config = SlotConfig::from_toml_str("").unwrap();
    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.search.max_results, 50);
    assert_eq!(config.search.step_minutes, 30);
    assert_eq!(config.search.horizon_days, 100);
    assert_eq!(config.query_padding(), Duration::hours(24));

    let hours = config.opening_hours().unwrap();
    assert_eq!(hours.get(Weekday::Mon), None);
}

#[test]
fn opening_hours_are_parsed() {
    let hours = SlotConfig::from_toml_str(CONFIG)
        .unwrap()
        .opening_hours()
        .unwrap();

    assert_eq!(hours.timezone(), Tz::Europe__Berlin);
    let monday = hours.get(Weekday::Mon).unwrap();
    assert_eq!((monday.open, monday.close), (time(6, 0), time(18, 0)));
    let friday = hours.get(Weekday::Fri).unwrap();
    assert_eq!((friday.open, friday.close), (time(8, 30), time(12, 0)));
    assert_eq!(hours.get(Weekday::Tue), None);
}

#[test]
fn search_config_takes_file_defaults() {
    let config = SlotConfig::from_toml_str(CONFIG).unwrap();
    let start = Utc.with_ymd_and_hms(2012, 2, 3, 6, 0, 0).unwrap();

    let search = config.search_config(["Cal #1"], 60, start);

    assert_eq!(search.max_results, 10);
    assert_eq!(search.step_minutes, 15);
    assert_eq!(search.search_end, start + Duration::days(7));
    assert_eq!(config.query_padding(), Duration::zero());
}

#[test]
fn unknown_weekday_is_rejected() {
    let toml = "[opening_hours]\nfunday = { open = \"06:00\", close = \"18:00\" }";
    let err = SlotConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, SlotError::Config(_)));
}

#[test]
fn inverted_hours_are_rejected() {
    let toml = "[opening_hours]\nmon = { open = \"18:00\", close = \"06:00\" }";
    let err = SlotConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, SlotError::Config(_)));
}

#[test]
fn malformed_time_is_rejected() {
    let toml = "[opening_hours]\nmon = { open = \"six\", close = \"18:00\" }";
    let err = SlotConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, SlotError::Config(_)));
}

#[test]
fn unknown_timezone_is_rejected() {
    let err = SlotConfig::from_toml_str("timezone = \"Mars/Olympus\"").unwrap_err();
    assert!(matches!(err, SlotError::InvalidTimezone(_)));
}

#[test]
fn zero_step_is_rejected() {
    let err = SlotConfig::from_toml_str("[search]\nstep_minutes = 0").unwrap_err();
    assert!(matches!(err, SlotError::Config(_)));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SlotConfig::from_toml_str("colour = \"blue\"").unwrap_err();
    assert!(matches!(err, SlotError::Config(_)));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let config = SlotConfig::load(&path).unwrap();
    assert_eq!(config.search.max_results, 10);
}
