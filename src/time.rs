use chrono::Local;

use crate::ledger::CalendarDate;

/// Clock abstracts access to "today" so target calculations stay deterministic in tests.
pub trait Clock: Send + Sync {
    /// The current local calendar date.
    fn today(&self) -> CalendarDate;
}

/// Real-time clock backed by the local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::from_naive(Local::now().date_naive())
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
