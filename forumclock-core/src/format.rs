//! Formatting helpers for post, comment and event timestamps.
//!
//! Two labels are produced:
//! - a relative label ("5 minutes ago") for comments and posts, and
//! - an absolute calendar label ("Today at 14:05", "Friday, May 30") for
//!   creation and scheduling dates.
//!
//! The two paths correct for the server's timezone differently. The
//! relative path adds a flat [`SERVER_OFFSET_HOURS`] to the parsed instant
//! in every season, while the absolute path shifts both sides of its
//! same-day check by the seasonal offset from [`crate::dst`]. The paths are
//! kept separate on purpose until it is settled which correction the backend
//! actually needs.

use crate::clock::{Clock, SystemClock};
use crate::dst;
use crate::locale::Locale;
use crate::timestamp::{has_display_headroom, parse_timestamp};
use chrono::{DateTime, Datelike, Duration, SecondsFormat, Utc};

/// Flat correction added to every timestamp before computing a relative label.
pub const SERVER_OFFSET_HOURS: i64 = 3;

/// Returned when no timestamp was supplied.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Returned when a timestamp was supplied but could not be parsed.
pub const INVALID_DATE: &str = "Invalid date";

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 604_800;

/// Timestamp formatter bound to a clock and a display locale.
#[derive(Debug, Clone, Default)]
pub struct Formatter<C: Clock = SystemClock> {
    clock: C,
    locale: Locale,
}

impl Formatter<SystemClock> {
    /// Formatter on the wall clock with the default locale.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> Formatter<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Relative label for a raw timestamp string. Never fails.
    pub fn relative(&self, timestamp: Option<&str>) -> String {
        let raw = match timestamp {
            Some(raw) if !raw.is_empty() => raw,
            _ => return UNKNOWN_DATE.to_string(),
        };

        match parse_timestamp(raw) {
            Ok(instant) => self.relative_instant(instant),
            Err(e) => {
                tracing::warn!(input = raw, error = %e, "Invalid date");
                INVALID_DATE.to_string()
            }
        }
    }

    /// Relative label for an already parsed instant.
    pub fn relative_instant(&self, instant: DateTime<Utc>) -> String {
        let adjusted = match instant.checked_add_signed(Duration::hours(SERVER_OFFSET_HOURS)) {
            Some(adjusted) if has_display_headroom(instant) => adjusted,
            _ => return INVALID_DATE.to_string(),
        };
        // Future instants give a negative delta and land in "just now".
        let seconds = self.clock.now().signed_duration_since(adjusted).num_seconds();

        if seconds < MINUTE {
            "just now".to_string()
        } else if seconds < HOUR {
            ago(seconds / MINUTE, "minute")
        } else if seconds < DAY {
            ago(seconds / HOUR, "hour")
        } else if seconds < WEEK {
            ago(seconds / DAY, "day")
        } else {
            self.locale.short_date(&dst::to_local(adjusted))
        }
    }

    /// Calendar label for an instant, "Today" when it falls on the current
    /// local day.
    ///
    /// Instants too close to the end of the calendar to be shifted into the
    /// zone render as [`INVALID_DATE`].
    pub fn absolute(&self, instant: DateTime<Utc>, include_time: bool) -> String {
        let now = self.clock.now();
        if !has_display_headroom(instant) || !has_display_headroom(now) {
            return INVALID_DATE.to_string();
        }
        let offset = dst::utc_offset(now);

        let shifted_now = now.with_timezone(&offset);
        let shifted = instant.with_timezone(&offset);

        let local = dst::to_local(instant);
        if shifted.date_naive() == shifted_now.date_naive() {
            return if include_time {
                format!("Today at {}", self.locale.clock_time(&local))
            } else {
                "Today".to_string()
            };
        }

        let with_year = shifted.year() != shifted_now.year();
        self.locale.calendar_date(&local, with_year, include_time)
    }

    /// Calendar label for a raw timestamp string.
    ///
    /// Missing or unparseable input is handed back unchanged so callers can
    /// leave the original text in place.
    pub fn absolute_str(&self, timestamp: Option<&str>, include_time: bool) -> String {
        let raw = timestamp.unwrap_or_default();
        match parse_timestamp(raw) {
            Ok(instant) => self.absolute(instant, include_time),
            Err(e) => {
                if !raw.is_empty() {
                    tracing::debug!(input = raw, error = %e, "Leaving unparseable date as is");
                }
                raw.to_string()
            }
        }
    }
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Normalize a timestamp to RFC 3339 UTC with millisecond precision.
///
/// Returns an empty string for missing or invalid input.
pub fn format_iso(timestamp: Option<&str>) -> String {
    timestamp
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| parse_timestamp(raw).ok())
        .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Relative label against the wall clock.
pub fn format_relative(timestamp: Option<&str>) -> String {
    Formatter::new().relative(timestamp)
}

/// Calendar label against the wall clock.
pub fn format_absolute(instant: DateTime<Utc>, include_time: bool) -> String {
    Formatter::new().absolute(instant, include_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn formatter_at(now: DateTime<Utc>) -> Formatter<ManualClock> {
        Formatter::with_clock(ManualClock::new(now))
    }

    /// A raw timestamp whose corrected instant lies `secs` before `now`.
    fn stamp_before(now: DateTime<Utc>, secs: i64) -> String {
        let raw = now - Duration::hours(SERVER_OFFSET_HOURS) - Duration::seconds(secs);
        raw.to_rfc3339()
    }

    #[test]
    fn test_relative_sentinels() {
        let f = formatter_at(utc(2025, 6, 1, 12, 0));
        assert_eq!(f.relative(None), "Unknown date");
        assert_eq!(f.relative(Some("")), "Unknown date");
        assert_eq!(f.relative(Some("not-a-date")), "Invalid date");
        assert_eq!(f.relative(Some("   ")), "Invalid date");
    }

    #[test]
    fn test_relative_thresholds() {
        let now = utc(2025, 6, 1, 12, 0);
        let f = formatter_at(now);
        let cases = [
            (0, "just now"),
            (59, "just now"),
            (60, "1 minute ago"),
            (119, "1 minute ago"),
            (120, "2 minutes ago"),
            (3599, "59 minutes ago"),
            (3600, "1 hour ago"),
            (7199, "1 hour ago"),
            (7200, "2 hours ago"),
            (86399, "23 hours ago"),
            (86400, "1 day ago"),
            (172800, "2 days ago"),
            (604799, "6 days ago"),
        ];
        for (secs, expected) in cases {
            assert_eq!(
                f.relative(Some(&stamp_before(now, secs))),
                expected,
                "delta {secs}s"
            );
        }
    }

    #[test]
    fn test_relative_week_cutover_switches_to_date() {
        let now = utc(2025, 6, 1, 12, 0);
        let raw = stamp_before(now, 604800);

        let uk = formatter_at(now);
        assert_eq!(uk.relative(Some(&raw)), "25 трав. 2025 р.");

        let en = formatter_at(now).with_locale(Locale::En);
        let label = en.relative(Some(&raw));
        assert_eq!(label, "25 May 2025");
        assert!(!label.contains("ago"));
    }

    #[test]
    fn test_relative_future_is_just_now() {
        let now = utc(2025, 6, 1, 12, 0);
        let f = formatter_at(now);
        assert_eq!(f.relative(Some("2025-06-02T12:00:00Z")), "just now");
    }

    #[test]
    fn test_relative_offset_is_flat_in_winter() {
        // Winter: the zone is UTC+2 but the correction stays at three hours.
        let now = utc(2025, 1, 15, 12, 0);
        let f = formatter_at(now);
        assert_eq!(f.relative(Some("2025-01-15T09:00:00Z")), "just now");
        assert_eq!(f.relative(Some("2025-01-15T08:00:00Z")), "1 hour ago");
    }

    #[test]
    fn test_relative_naive_timestamp_is_zone_wall_clock() {
        // 07:30 in Kyiv summer is 04:30Z, corrected to 07:30Z.
        let now = utc(2025, 6, 1, 12, 0);
        let f = formatter_at(now);
        assert_eq!(f.relative(Some("2025-06-01T07:30:00")), "4 hours ago");
        assert_eq!(f.relative(Some("2025-06-01T12:00:00")), "just now");

        // Winter: 12:00 Kyiv is 10:00Z, corrected to 13:00Z.
        let f = formatter_at(utc(2025, 1, 15, 14, 0));
        assert_eq!(f.relative(Some("2025-01-15T12:00:00")), "1 hour ago");
    }

    #[test]
    fn test_calendar_end_renders_invalid_date() {
        let f = formatter_at(utc(2025, 6, 1, 12, 0));
        assert_eq!(f.relative(Some("+262142-12-31T23:00:00")), "Invalid date");
        assert_eq!(f.relative_instant(DateTime::<Utc>::MAX_UTC), "Invalid date");
        assert_eq!(f.absolute(DateTime::<Utc>::MAX_UTC, true), "Invalid date");
        assert_eq!(
            f.absolute_str(Some("+262142-12-31T23:00:00"), true),
            "+262142-12-31T23:00:00"
        );
        assert_eq!(format_iso(Some("+262142-12-31T23:00:00")), "");

        let at_end = formatter_at(DateTime::<Utc>::MAX_UTC);
        assert_eq!(at_end.absolute(utc(2025, 6, 1, 12, 0), false), "Invalid date");
    }

    #[test]
    fn test_absolute_today() {
        let now = utc(2025, 6, 1, 12, 0);
        let f = formatter_at(now);
        assert_eq!(f.absolute(now, false), "Today");
        assert_eq!(f.absolute(now, true), "Today at 15:00");
    }

    #[test]
    fn test_absolute_other_days() {
        let now = utc(2025, 6, 1, 12, 0);
        let f = formatter_at(now).with_locale(Locale::En);

        let friday = utc(2025, 5, 30, 12, 0);
        assert_eq!(f.absolute(friday, false), "Friday, May 30");
        assert_eq!(f.absolute(friday, true), "Friday, May 30 at 03:00 PM");

        let last_year = utc(2024, 12, 25, 10, 0);
        assert_eq!(f.absolute(last_year, false), "Wednesday, Dec 25, 2024");

        let uk = formatter_at(now);
        assert_eq!(uk.absolute(friday, false), "пʼятниця, 30 трав.");
        assert_eq!(uk.absolute(last_year, true), "середа, 25 груд. 2024 р. о 12:00");
    }

    #[test]
    fn test_absolute_local_midnight_boundary() {
        // 21:30 UTC is already 00:30 the next day in summer.
        let now = utc(2025, 6, 1, 21, 30);
        let f = formatter_at(now).with_locale(Locale::En);
        assert_eq!(f.absolute(utc(2025, 6, 1, 21, 10), false), "Today");
        assert_eq!(f.absolute(utc(2025, 6, 1, 20, 30), false), "Sunday, Jun 1");
    }

    #[test]
    fn test_absolute_on_spring_transition_day() {
        // DST begins 2025-03-30 01:00 UTC.
        let now = utc(2025, 3, 30, 10, 0);
        let f = formatter_at(now).with_locale(Locale::En);
        assert_eq!(f.absolute(now, true), "Today at 01:00 PM");
        assert_eq!(f.absolute(utc(2025, 3, 29, 22, 30), false), "Today");
        assert_eq!(f.absolute(utc(2025, 3, 29, 20, 30), false), "Saturday, Mar 29");
    }

    #[test]
    fn test_absolute_on_autumn_transition_day() {
        // DST ends 2025-10-26 01:00 UTC.
        let now = utc(2025, 10, 26, 12, 0);
        let f = formatter_at(now);
        assert_eq!(f.absolute(now, true), "Today at 14:00");
        assert_eq!(f.absolute(utc(2025, 10, 25, 22, 30), true), "Today at 01:30");
    }

    #[test]
    fn test_absolute_str_passthrough() {
        let now = utc(2025, 6, 1, 12, 0);
        let f = formatter_at(now);
        assert_eq!(f.absolute_str(Some("2025-06-01T10:00:00Z"), false), "Today");
        assert_eq!(f.absolute_str(Some("soon"), true), "soon");
        assert_eq!(f.absolute_str(None, true), "");
    }

    #[test]
    fn test_format_iso() {
        assert_eq!(format_iso(None), "");
        assert_eq!(format_iso(Some("")), "");
        assert_eq!(format_iso(Some("garbage")), "");
        assert_eq!(
            format_iso(Some("2025-03-30T10:00:00+02:00")),
            "2025-03-30T08:00:00.000Z"
        );
    }

    #[test]
    fn test_format_iso_preserves_instant() {
        for raw in [
            "2025-03-30T10:00:00+02:00",
            "2024-02-29T23:59:59.123Z",
            "2025-06-01 08:15:00",
        ] {
            let iso = format_iso(Some(raw));
            assert_eq!(parse_timestamp(&iso).unwrap(), parse_timestamp(raw).unwrap());
        }
    }
}
