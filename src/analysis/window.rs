//! Date windows shared by the analyses: trailing whole-month lookbacks, inclusive
//! ranges, and the two week-numbering schemes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::LedgerError,
    ledger::CalendarDate,
};

/// Trailing window of whole months ending right before the reference month starts.
///
/// The window is half-open: `start` is included, `end` (the first day of the
/// reference month) is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl LookbackWindow {
    pub fn new(reference: CalendarDate, months_back: u32) -> Self {
        let end = reference.start_of_month();
        let months = i32::try_from(months_back).unwrap_or(i32::MAX);
        let start = end.shift_months(-months).unwrap_or(CalendarDate::MIN);
        Self { start, end }
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl DateRange {
    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} .. {}", self.start, self.end)
        }
    }
}

/// How week numbers are assigned when matching records to the current week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekNumbering {
    /// ISO-8601 weeks (Monday start).
    #[default]
    Iso,
    /// Sunday-start weeks, week 1 contains January 1st.
    Sunday,
}

impl WeekNumbering {
    pub fn week_of(self, date: CalendarDate) -> u32 {
        match self {
            WeekNumbering::Iso => date.iso_week(),
            WeekNumbering::Sunday => date.sunday_week(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeekNumbering::Iso => "iso",
            WeekNumbering::Sunday => "sunday",
        }
    }
}

impl FromStr for WeekNumbering {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso" => Ok(WeekNumbering::Iso),
            "sunday" | "us" => Ok(WeekNumbering::Sunday),
            other => Err(LedgerError::InvalidPeriod(format!("week numbering `{other}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).expect("valid date")
    }

    #[test]
    fn window_ends_before_reference_month() {
        let window = LookbackWindow::new(date("2025-03-04"), 2);
        assert_eq!(window.start, date("2025-01-01"));
        assert_eq!(window.end, date("2025-03-01"));
        assert!(window.contains(date("2025-01-01")));
        assert!(window.contains(date("2025-02-28")));
        assert!(!window.contains(date("2025-03-01")));
        assert!(!window.contains(date("2024-12-31")));
    }

    #[test]
    fn window_crosses_year_boundary() {
        let window = LookbackWindow::new(date("2025-01-20"), 3);
        assert_eq!(window.start, date("2024-10-01"));
        assert_eq!(window.end, date("2025-01-01"));
    }

    #[test]
    fn zero_months_is_empty() {
        let window = LookbackWindow::new(date("2025-03-04"), 0);
        assert!(window.is_empty());
        assert!(!window.contains(date("2025-03-01")));
    }

    #[test]
    fn week_numbering_parses() {
        assert_eq!("ISO".parse::<WeekNumbering>().expect("iso"), WeekNumbering::Iso);
        assert_eq!("sunday".parse::<WeekNumbering>().expect("sunday"), WeekNumbering::Sunday);
        assert!("lunar".parse::<WeekNumbering>().is_err());
    }
}
