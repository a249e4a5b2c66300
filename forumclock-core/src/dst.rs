//! Daylight-saving rule for the display timezone (Europe/Kyiv).
//!
//! The zone runs at UTC+2 in winter and UTC+3 in summer. Summer time starts
//! on the last Sunday of March at 03:00 local and ends on the last Sunday of
//! October at 04:00 local; both moments are 01:00 UTC.
//!
//! Windows are cheap to compute and always derived from the year of the
//! instant being asked about, so nothing here is cached.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc, Weekday,
};

/// Winter offset from UTC, in hours.
pub const STANDARD_OFFSET_HOURS: i32 = 2;

/// Summer offset from UTC, in hours.
pub const SUMMER_OFFSET_HOURS: i32 = 3;

const START_LOCAL_HOUR: u32 = 3;
const END_LOCAL_HOUR: u32 = 4;

/// The half-open interval `[start, end)` during which summer time applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DstWindow {
    /// Compute the window for a calendar year.
    ///
    /// Returns `None` when the year lies outside the representable calendar.
    pub fn for_year(year: i32) -> Option<Self> {
        // Clocks go forward from standard time and back from summer time,
        // so each local wall-clock moment is converted with the offset in
        // force just before it.
        let start = local_to_utc(
            last_sunday(year, 3)?,
            START_LOCAL_HOUR,
            STANDARD_OFFSET_HOURS,
        )?;
        let end = local_to_utc(last_sunday(year, 10)?, END_LOCAL_HOUR, SUMMER_OFFSET_HOURS)?;
        Some(Self { start, end })
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Whether summer time is in force at `instant`.
pub fn is_dst(instant: DateTime<Utc>) -> bool {
    DstWindow::for_year(local_year(instant)).map_or(false, |w| w.contains(instant))
}

/// The zone's UTC offset at `instant`.
pub fn utc_offset(instant: DateTime<Utc>) -> FixedOffset {
    let hours = if is_dst(instant) {
        SUMMER_OFFSET_HOURS
    } else {
        STANDARD_OFFSET_HOURS
    };
    hours_east(hours)
}

/// Render `instant` as zone-local time using its own seasonal offset.
///
/// Callers must keep `instant` a few hours clear of the calendar's upper
/// bound; see [`crate::timestamp::has_display_headroom`].
pub fn to_local(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&utc_offset(instant))
}

/// Interpret a zone wall-clock reading as a UTC instant.
///
/// A reading that exists in summer time resolves to it, which picks the
/// earlier instant for the repeated hour in October. A reading inside the
/// skipped hour in March is taken on the standard clock and so lands one
/// hour later in summer time.
pub fn local_naive_to_utc(local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let summer = shift_back(local, SUMMER_OFFSET_HOURS);
    if let Some(summer) = summer {
        if is_dst(summer) {
            return Some(summer);
        }
    }
    shift_back(local, STANDARD_OFFSET_HOURS)
}

/// Last Sunday of `month`, found by walking back from the month's final day.
pub fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let mut day = last_day_of_month(year, month)?;
    while day.weekday() != Weekday::Sun {
        day = day.pred_opt()?;
    }
    Some(day)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn local_to_utc(date: NaiveDate, hour: u32, offset_hours: i32) -> Option<DateTime<Utc>> {
    shift_back(date.and_hms_opt(hour, 0, 0)?, offset_hours)
}

fn shift_back(local: NaiveDateTime, offset_hours: i32) -> Option<DateTime<Utc>> {
    local
        .checked_sub_signed(Duration::hours(i64::from(offset_hours)))
        .map(|utc| utc.and_utc())
}

/// Calendar year of `instant` on the zone's standard-time wall clock.
fn local_year(instant: DateTime<Utc>) -> i32 {
    instant
        .naive_utc()
        .checked_add_signed(Duration::hours(i64::from(STANDARD_OFFSET_HOURS)))
        .map_or(instant.year(), |local| local.year())
}

fn hours_east(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}
