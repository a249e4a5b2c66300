//! Parsing of backend timestamp strings.
//!
//! The backend serializes datetimes as ISO-8601. Values carrying an offset
//! are honored. Naive date-times are read on the display zone's wall clock,
//! the way the browser pages read them; the relative label's flat correction
//! in [`crate::format`] is tuned to that reading.

use crate::dst;
use crate::error::{Error, Result};
use crate::format::SERVER_OFFSET_HOURS;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp into a UTC instant.
///
/// Accepted shapes:
/// - RFC 3339 (`2025-03-30T10:00:00+02:00`, `2025-03-30T08:00:00.123Z`)
/// - naive date-time (`2025-07-01T12:00:00`, `2025-07-01 12:00:00.5`), read as
///   Europe/Kyiv wall-clock time
/// - date only (`2025-03-30`), read as UTC midnight
///
/// Input is not trimmed. Instants too close to the end of the calendar to be
/// shown in the display zone are rejected.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let instant = parse_any(input)?;
    if !has_display_headroom(instant) {
        return Err(invalid(input, "out of displayable range"));
    }
    Ok(instant)
}

fn parse_any(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return dst::local_naive_to_utc(naive)
                .ok_or_else(|| invalid(input, "out of displayable range"));
        }
    }

    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| invalid(input, "date out of range")),
        Err(e) => Err(invalid(input, &e.to_string())),
    }
}

/// Whether `instant` can take the relative label's correction and still be
/// rendered on the zone's summer clock.
pub fn has_display_headroom(instant: DateTime<Utc>) -> bool {
    let headroom = Duration::hours(SERVER_OFFSET_HOURS + i64::from(dst::SUMMER_OFFSET_HOURS));
    instant.checked_add_signed(headroom).is_some()
}

fn invalid(input: &str, reason: &str) -> Error {
    Error::InvalidTimestamp {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
