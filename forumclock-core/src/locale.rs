//! Calendar vocabulary for the supported display locales.

use crate::error::Error;
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use serde::Deserialize;

/// Display locale for calendar strings.
///
/// Relative labels ("just now", "3 hours ago") and the "Today" label are
/// English in every locale; only calendar dates are localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Locale {
    /// Ukrainian (`uk-UA`)
    #[default]
    Uk,
    /// English (`en-US`)
    En,
}

const UK_WEEKDAYS: [&str; 7] = [
    "понеділок",
    "вівторок",
    "середа",
    "четвер",
    "пʼятниця",
    "субота",
    "неділя",
];

const UK_MONTHS: [&str; 12] = [
    "січ.", "лют.", "бер.", "квіт.", "трав.", "черв.", "лип.", "серп.", "вер.", "жовт.",
    "лист.", "груд.",
];

const EN_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Uk => "uk",
            Locale::En => "en",
        }
    }

    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        let idx = weekday.num_days_from_monday() as usize;
        match self {
            Locale::Uk => UK_WEEKDAYS[idx],
            Locale::En => EN_WEEKDAYS[idx],
        }
    }

    /// Abbreviated month name for a 1-based month.
    pub fn month_abbrev(&self, month: u32) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::Uk => UK_MONTHS[idx],
            Locale::En => EN_MONTHS[idx],
        }
    }

    /// `{day} {month} {year}`, e.g. `30 бер. 2025 р.` / `30 Mar 2025`.
    pub fn short_date(&self, local: &DateTime<FixedOffset>) -> String {
        let month = self.month_abbrev(local.month());
        match self {
            Locale::Uk => format!("{} {} {} р.", local.day(), month, local.year()),
            Locale::En => format!("{} {} {}", local.day(), month, local.year()),
        }
    }

    /// Weekday, day and month, with the year and `HH:MM` only when asked.
    pub fn calendar_date(
        &self,
        local: &DateTime<FixedOffset>,
        with_year: bool,
        with_time: bool,
    ) -> String {
        let weekday = self.weekday_name(local.weekday());
        let month = self.month_abbrev(local.month());
        let mut out = match self {
            Locale::Uk => format!("{}, {} {}", weekday, local.day(), month),
            Locale::En => format!("{}, {} {}", weekday, month, local.day()),
        };

        if with_year {
            match self {
                Locale::Uk => out.push_str(&format!(" {} р.", local.year())),
                Locale::En => out.push_str(&format!(", {}", local.year())),
            }
        }

        if with_time {
            let connector = match self {
                Locale::Uk => "о",
                Locale::En => "at",
            };
            out.push_str(&format!(" {} {}", connector, self.clock_time(local)));
        }

        out
    }

    /// Time of day: `HH:MM` for `Uk`, `hh:MM AM`/`PM` for `En`.
    pub fn clock_time(&self, local: &DateTime<FixedOffset>) -> String {
        match self {
            Locale::Uk => format!("{:02}:{:02}", local.hour(), local.minute()),
            Locale::En => {
                let (pm, hour) = local.hour12();
                let meridiem = if pm { "PM" } else { "AM" };
                format!("{:02}:{:02} {}", hour, local.minute(), meridiem)
            }
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uk" | "uk-ua" | "uk_ua" => Ok(Locale::Uk),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            _ => Err(Error::UnknownLocale(s.to_string())),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
