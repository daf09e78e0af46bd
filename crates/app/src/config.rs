use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use stride_core::{Clock, StreakCalculator};

use crate::seed::MAX_DEMO_DAYS;

#[derive(Debug, Parser)]
#[command(name = "stride")]
#[command(about = "Personal learning-progress tracker")]
#[command(version)]
pub struct Cli {
    /// Pin "now" to an RFC 3339 timestamp instead of the system clock
    #[arg(long, global = true, env = "STRIDE_NOW", value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,

    /// Offset used to decide which calendar day a completion falls on
    #[arg(
        long,
        global = true,
        env = "STRIDE_UTC_OFFSET",
        default_value = "+00:00",
        value_parser = parse_utc_offset
    )]
    pub utc_offset: FixedOffset,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print dashboard statistics as JSON
    Stats {
        /// JSON data file with `courses` and `lessons`; a demo is seeded when absent
        #[arg(long)]
        data: Option<PathBuf>,

        /// User whose dashboard to compute
        #[arg(long, default_value_t = 1)]
        user: u64,

        /// Consecutive days of completed lessons in the seeded demo
        #[arg(long, default_value_t = 3, value_parser = demo_days())]
        seed_days: u32,
    },
    /// Write the demo data set to a JSON file usable with `stats --data`
    Seed {
        /// Output path
        #[arg(long, default_value = "stride-demo.json")]
        out: PathBuf,

        /// Owner of the demo course
        #[arg(long, default_value_t = 1)]
        user: u64,

        /// Consecutive days of completed lessons
        #[arg(long, default_value_t = 3, value_parser = demo_days())]
        days: u32,
    },
    /// Print the streak for a list of completion dates
    Streak {
        /// Reference day (defaults to today in the configured offset)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Completion dates, YYYY-MM-DD
        dates: Vec<NaiveDate>,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub clock: Clock,
    pub calculator: StreakCalculator,
}

impl AppConfig {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let clock = cli.now.map_or_else(Clock::default_clock, Clock::fixed);
        Self {
            clock,
            calculator: StreakCalculator::new(cli.utc_offset),
        }
    }
}

fn demo_days() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(MAX_DEMO_DAYS))
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

/// Accepts `Z`, `UTC`, `±HH`, `±HHMM` and `±HH:MM`.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "invalid offset".to_string());
    }

    let (sign, rest) = match raw.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(format!("offset must start with + or -: {raw}")),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    let (hours, minutes) = match digits.len() {
        2 => (digits.as_str(), "0"),
        4 => digits.split_at(2),
        _ => return Err(format!("expected ±HH:MM, got {raw}")),
    };
    let hours: i32 = hours
        .parse()
        .map_err(|_| format!("invalid hours in {raw}"))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| format!("invalid minutes in {raw}"))?;
    if hours > 23 || minutes > 59 {
        return Err(format!("offset out of range: {raw}"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("offset out of range: {raw}"))
}
