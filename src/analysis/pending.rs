//! Period filtering of unpaid expenses ("upcoming payables").

use std::{fmt, str::FromStr};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::window::DateRange;
use crate::{
    errors::{LedgerError, Result},
    ledger::{CalendarDate, Record, RecordId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Inclusive range of dates the period covers around `selected`.
    /// Weeks run Monday to Sunday.
    pub fn range(self, selected: CalendarDate) -> DateRange {
        let (start, end) = match self {
            Period::Day => (selected, selected),
            Period::Week => selected.monday_week_bounds(),
            Period::Month => selected.month_bounds(),
        };
        DateRange { start, end }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            _ => Err(LedgerError::InvalidPeriod(s.to_string())),
        }
    }
}

/// Period selection plus optional secondary filters, all combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFilter {
    pub period: Period,
    pub selected_date: CalendarDate,
    pub category: Option<String>,
    pub weekday: Option<Weekday>,
    text: Option<String>,
}

impl PendingFilter {
    pub fn new(period: Period, selected_date: CalendarDate) -> Self {
        Self {
            period,
            selected_date,
            category: None,
            weekday: None,
            text: None,
        }
    }

    /// Builds a filter from raw period and date strings.
    pub fn parse(period: &str, selected_date: &str) -> Result<Self> {
        Ok(Self::new(period.parse()?, CalendarDate::parse(selected_date)?))
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.is_empty()).then_some(category);
        self
    }

    pub fn with_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }

    /// Case-insensitive substring match on the description.
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        let needle = text.as_ref().trim().to_lowercase();
        self.text = (!needle.is_empty()).then_some(needle);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn matches_period(&self, due: CalendarDate) -> bool {
        match self.period {
            Period::Day => due == self.selected_date,
            Period::Month => {
                due.year() == self.selected_date.year() && due.month() == self.selected_date.month()
            }
            Period::Week => self.period.range(self.selected_date).contains(due),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let Some(due) = record.pending_due_date() else {
            return false;
        };
        if !self.matches_period(due) {
            return false;
        }
        if let Some(category) = &self.category {
            if &record.category != category {
                return false;
            }
        }
        if let Some(weekday) = self.weekday {
            if due.weekday() != weekday {
                return false;
            }
        }
        if let Some(needle) = &self.text {
            if !record.description.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Filtered payables with their aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSummary<'a> {
    pub period: Period,
    pub range: DateRange,
    pub records: Vec<&'a Record>,
    pub total: f64,
    pub count: usize,
}

impl PendingSummary<'_> {
    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|record| record.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Unpaid expenses that carry a due date.
pub fn pending_expenses(records: &[Record]) -> impl Iterator<Item = &Record> {
    records
        .iter()
        .filter(|record| record.pending_due_date().is_some())
}

pub fn filter_pending<'a>(records: &'a [Record], filter: &PendingFilter) -> PendingSummary<'a> {
    let matched: Vec<&Record> = pending_expenses(records)
        .filter(|record| filter.matches(record))
        .collect();
    let total = matched.iter().map(|record| record.amount).sum();
    PendingSummary {
        period: filter.period,
        range: filter.period.range(filter.selected_date),
        count: matched.len(),
        records: matched,
        total,
    }
}
