//! `slots` CLI -- check and search calendar placements from a JSON feed.
//!
//! ## Usage
//!
//! ```sh
//! # List calendars in a feed
//! slots calendars --feed calendars.json
//!
//! # Is Friday 07:30-08:00 free in "Cal #1"?
//! slots check --feed calendars.json --config slots.toml \
//!   --calendar "Cal #1" --start 2012-02-03T07:30:00+01:00 --end 2012-02-03T08:00:00+01:00
//!
//! # Find up to five one-hour slots across two calendars
//! slots search --feed calendars.json --config slots.toml \
//!   --calendar "Cal #1" --calendar "Cal #2" \
//!   --start 2012-02-03T07:00:00+01:00 --duration 60 --max 5 --json
//! ```
//!
//! Timestamps without an offset are read in the configured timezone.
//! Set `RUST_LOG` or pass `-v` for diagnostics on stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{
    find_placements, AvailabilityChecker, CalendarProvider, InMemoryProvider, OpeningHours,
    PlacementCandidate, SlotConfig, TimeInterval,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Find free calendar placements")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with opening hours and search defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the calendars in a feed
    Calendars {
        /// JSON calendar feed
        #[arg(short, long)]
        feed: PathBuf,
    },
    /// Check whether one interval can be placed in a calendar
    Check {
        /// JSON calendar feed
        #[arg(short, long)]
        feed: PathBuf,
        /// Calendar name
        #[arg(long)]
        calendar: String,
        /// Interval start (RFC 3339, or local time in the configured timezone)
        #[arg(long)]
        start: String,
        /// Interval end
        #[arg(long)]
        end: String,
    },
    /// Search for free placements across calendars
    Search {
        /// JSON calendar feed
        #[arg(short, long)]
        feed: PathBuf,
        /// Calendar name; repeat to search several, ties break in this order
        #[arg(long = "calendar", required = true)]
        calendars: Vec<String>,
        /// Search start
        #[arg(long)]
        start: String,
        /// Search end (defaults to the configured horizon)
        #[arg(long)]
        end: Option<String>,
        /// Event duration in minutes
        #[arg(long)]
        duration: u32,
        /// Maximum number of placements
        #[arg(long)]
        max: Option<usize>,
        /// Step between candidates in minutes
        #[arg(long)]
        step: Option<u32>,
        /// Print placements as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SlotConfig::default(),
    };
    let hours = config
        .opening_hours()
        .context("Invalid opening hours in config")?;

    match cli.command {
        Commands::Calendars { feed } => {
            let provider = load_feed(&feed)?;
            for calendar in provider.list_calendars()? {
                println!("{}", calendar.name);
            }
        }
        Commands::Check {
            feed,
            calendar,
            start,
            end,
        } => {
            let provider = load_feed(&feed)?;
            let interval = TimeInterval::new(
                parse_instant(&start, &hours)?,
                parse_instant(&end, &hours)?,
            )?;
            let checker = AvailabilityChecker::new(provider, hours)
                .with_query_padding(config.query_padding());

            let verdict = checker
                .check(&calendar, &interval)
                .with_context(|| format!("Failed to check calendar '{}'", calendar))?;
            if verdict.is_placeable() {
                println!("placeable");
            } else {
                println!("not placeable: {}", verdict);
            }
        }
        Commands::Search {
            feed,
            calendars,
            start,
            end,
            duration,
            max,
            step,
            json,
        } => {
            let provider = load_feed(&feed)?;
            let search_start = parse_instant(&start, &hours)?;

            let mut search = config.search_config(calendars, duration, search_start);
            if let Some(end) = end {
                search = search.with_search_end(parse_instant(&end, &hours)?);
            }
            if let Some(max) = max {
                search = search.with_max_results(max);
            }
            if let Some(step) = step {
                search = search.with_step_minutes(step);
            }
            debug!(?search, "running placement search");

            let checker = AvailabilityChecker::new(provider, hours.clone())
                .with_query_padding(config.query_padding());
            let placements =
                find_placements(&checker, &search).context("Placement search failed")?;

            print_placements(&placements, &hours, json)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "slot_engine=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_feed(path: &Path) -> Result<InMemoryProvider> {
    InMemoryProvider::load(path)
        .with_context(|| format!("Failed to load calendar feed: {}", path.display()))
}

/// Parse RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` in the hours' timezone.
fn parse_instant(text: &str, hours: &OpeningHours) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("Invalid datetime '{}'", text))?;
    let local = hours
        .timezone()
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("'{}' does not exist in {}", text, hours.timezone()))?;
    Ok(local.with_timezone(&Utc))
}

#[derive(Serialize)]
struct PlacementDto {
    calendar: String,
    start: String,
    end: String,
}

fn print_placements(
    placements: &[PlacementCandidate],
    hours: &OpeningHours,
    json: bool,
) -> Result<()> {
    let tz = hours.timezone();
    let rows: Vec<PlacementDto> = placements
        .iter()
        .map(|p| PlacementDto {
            calendar: p.calendar.clone(),
            start: p.interval.start().with_timezone(&tz).to_rfc3339(),
            end: p.interval.end().with_timezone(&tz).to_rfc3339(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("no placements found");
    } else {
        for row in rows {
            println!("{}\t{}\t{}", row.calendar, row.start, row.end);
        }
    }
    Ok(())
}
