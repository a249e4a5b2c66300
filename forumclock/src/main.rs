//! forumclock - timestamp labels and throttling from the command line
//!
//! Renders backend timestamps the way the forum pages do, prints the
//! daylight-saving window for a year, and simulates the comment rate limiter.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, SecondsFormat};
use clap::{Parser, Subcommand};
use forumclock_core::dst::{self, DstWindow};
use forumclock_core::{
    format_iso, parse_timestamp, sort_by_date, Clock, Config, Formatter, Locale, ManualClock,
    RateLimiter, SortOrder, SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "forumclock")]
#[command(about = "Forum timestamp labels and rate limiting")]
#[command(version)]
struct Args {
    /// Calendar locale (uk or en); defaults to the configured one
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Pretend the current time is this ISO-8601 instant
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Relative label, e.g. "5 minutes ago"
    Relative { timestamp: String },

    /// Calendar label, e.g. "Today at 14:05"
    Absolute {
        timestamp: String,
        /// Append the time of day
        #[arg(long)]
        time: bool,
    },

    /// Normalize to RFC 3339 UTC (empty output for invalid input)
    Iso { timestamp: String },

    /// Print the daylight-saving window for a year
    Dst {
        /// Year (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Sort timestamps read from stdin, one per line (newest first)
    Sort {
        /// Oldest first
        #[arg(long)]
        asc: bool,
    },

    /// Simulate back-to-back rate limiter checks and print each result as JSON
    Throttle {
        /// Number of checks
        #[arg(long, default_value_t = 2)]
        count: u32,

        /// Minimum interval in milliseconds (default: configured value)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Simulated milliseconds between checks
        #[arg(long, default_value_t = 0)]
        gap_ms: u64,

        /// Message template; `{time}` becomes the seconds left
        #[arg(long)]
        message: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = forumclock_core::logging::init(&config.logging).ok();

    let locale = args.locale.unwrap_or(config.display.locale);
    let clock: Arc<dyn Clock> = match args.now.as_deref() {
        Some(raw) => {
            let now = parse_timestamp(raw).context("invalid --now value")?;
            Arc::new(ManualClock::new(now))
        }
        None => Arc::new(SystemClock),
    };

    tracing::debug!(command = ?args.command, %locale, "Running command");

    let formatter = Formatter::with_clock(clock.clone()).with_locale(locale);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Relative { timestamp } => {
            writeln!(out, "{}", formatter.relative(Some(&timestamp)))?;
        }
        Command::Absolute { timestamp, time } => {
            let instant = parse_timestamp(&timestamp).context("invalid timestamp")?;
            writeln!(out, "{}", formatter.absolute(instant, time))?;
        }
        Command::Iso { timestamp } => {
            writeln!(out, "{}", format_iso(Some(&timestamp)))?;
        }
        Command::Dst { year } => {
            let year = year.unwrap_or_else(|| dst::to_local(clock.now()).year());
            let window = DstWindow::for_year(year)
                .with_context(|| format!("year {year} is out of range"))?;
            writeln!(
                out,
                "start: {}",
                window.start.to_rfc3339_opts(SecondsFormat::Secs, true)
            )?;
            writeln!(
                out,
                "end: {}",
                window.end.to_rfc3339_opts(SecondsFormat::Secs, true)
            )?;
        }
        Command::Sort { asc } => {
            let lines = io::stdin()
                .lock()
                .lines()
                .collect::<io::Result<Vec<String>>>()
                .context("failed to read stdin")?;
            let lines: Vec<String> = lines.into_iter().filter(|l| !l.is_empty()).collect();
            let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
            for line in sort_by_date(&lines, order) {
                writeln!(out, "{}", line)?;
            }
        }
        Command::Throttle {
            count,
            interval_ms,
            gap_ms,
            message,
        } => {
            let mut settings = config.rate_limit.clone();
            if let Some(interval_ms) = interval_ms {
                settings.interval_ms = interval_ms;
            }
            if let Some(message) = message {
                settings.message = message;
            }
            settings.validate()?;

            let gap = i64::try_from(gap_ms)
                .map(Duration::milliseconds)
                .context("--gap-ms is too large")?;

            let sim_clock = Arc::new(ManualClock::new(clock.now()));
            let limiter = RateLimiter::with_clock(
                std::time::Duration::from_millis(settings.interval_ms),
                sim_clock.clone(),
            )
            .with_message(settings.message);

            for i in 0..count {
                if i > 0 {
                    let next = sim_clock
                        .now()
                        .checked_add_signed(gap)
                        .context("--gap-ms moves the simulated clock out of range")?;
                    sim_clock.set(next);
                }
                let check = limiter.check();
                writeln!(out, "{}", serde_json::to_string(&check)?)?;
            }
        }
    }

    Ok(())
}
