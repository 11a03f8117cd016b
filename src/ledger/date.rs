//! Timezone-free calendar dates.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated calendar date with no time or timezone attached.
///
/// Records carry their dates as `YYYY-MM-DD` strings; comparisons on this type are plain
/// calendar comparisons, so a date never drifts across a day boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub const MIN: CalendarDate = CalendarDate(NaiveDate::MIN);

    /// Parses a strict `YYYY-MM-DD` date.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let bytes = trimmed.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(idx, b)| idx == 4 || idx == 7 || b.is_ascii_digit());
        if !shaped {
            return Err(LedgerError::InvalidDateFormat(input.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Self)
            .map_err(|_| LedgerError::InvalidDateFormat(input.to_string()))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| LedgerError::InvalidDateFormat(format!("{year:04}-{month:02}-{day:02}")))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month of year, 1-based.
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Month of year, 0-based (January is 0).
    pub fn month_index(self) -> u32 {
        self.0.month0()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// `YYYY-MM` prefix of the date.
    pub fn month_key(self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }

    pub fn start_of_month(self) -> Self {
        // Day 1 exists in every month.
        Self(self.0 - Duration::days(i64::from(self.0.day0())))
    }

    /// Shifts by whole months, clamping the day to the length of the target month.
    pub fn shift_months(self, months: i32) -> Option<Self> {
        let index = self.year() * 12 + self.month_index() as i32 + months;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        let day = self.day().min(days_in_month(year, month)?);
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// ISO-8601 week number (weeks start on Monday, week 1 holds the first Thursday).
    pub fn iso_week(self) -> u32 {
        self.0.iso_week().week()
    }

    /// Week number with weeks starting on Sunday and week 1 being the week that contains
    /// January 1st. The last days of December may already belong to week 1.
    pub fn sunday_week(self) -> u32 {
        let week_start = self.0 - Duration::days(i64::from(self.weekday().num_days_from_sunday()));
        if let Some(next_year_start) = sunday_week_one(self.year() + 1) {
            if self.0 >= next_year_start {
                return 1;
            }
        }
        match sunday_week_one(self.year()) {
            Some(year_start) => ((week_start - year_start).num_days() / 7 + 1) as u32,
            None => self.iso_week(),
        }
    }

    /// Monday-to-Sunday week containing this date, both ends inclusive.
    pub fn monday_week_bounds(self) -> (Self, Self) {
        let start = self.add_days(-i64::from(self.weekday().num_days_from_monday()));
        (start, start.add_days(6))
    }

    /// First and last day of this date's month.
    pub fn month_bounds(self) -> (Self, Self) {
        let start = self.start_of_month();
        let last = days_in_month(self.year(), self.month()).unwrap_or(28);
        (start, start.add_days(i64::from(last) - 1))
    }
}

fn sunday_week_one(year: i32) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    Some(jan_first - Duration::days(i64::from(jan_first.weekday().num_days_from_sunday())))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some((first_next - Duration::days(1)).day())
}

/// Parses a weekday name such as `mon` or `Tuesday`.
pub fn parse_weekday(input: &str) -> Result<Weekday> {
    Weekday::from_str(input.trim()).map_err(|_| LedgerError::InvalidWeekday(input.to_string()))
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}
