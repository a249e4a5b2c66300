//! # forumclock-core
//!
//! Timestamp presentation and action throttling for the forum and events
//! front end.
//!
//! This library provides:
//! - Relative ("5 minutes ago") and calendar ("Today at 14:05") labels
//! - The Europe/Kyiv daylight-saving rule those labels depend on
//! - A once-per-interval rate limiter for user actions
//! - Configuration management
//! - Logging infrastructure
//!
//! Everything that reads the current time goes through a [`Clock`], so a
//! [`ManualClock`] makes any label or limiter decision reproducible.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use forumclock_core::{Formatter, Locale, ManualClock};
//!
//! let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
//! let formatter = Formatter::with_clock(ManualClock::new(now)).with_locale(Locale::En);
//!
//! assert_eq!(formatter.relative(Some("2025-06-01T08:55:00Z")), "5 minutes ago");
//! assert_eq!(formatter.absolute(now, true), "Today at 03:00 PM");
//! ```

// Re-export commonly used items at the crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use dst::DstWindow;
pub use error::{Error, Result};
pub use format::{format_absolute, format_iso, format_relative, Formatter};
pub use locale::Locale;
pub use rate_limit::{RateCheck, RateLimiter};
pub use sort::{sort_by_date, Dated, SortOrder};
pub use timestamp::parse_timestamp;

// Public modules
pub mod clock;
pub mod config;
pub mod dst;
pub mod error;
pub mod format;
pub mod locale;
pub mod logging;
pub mod rate_limit;
pub mod sort;
pub mod timestamp;
