//! Historical-average revenue targets.
//!
//! Every target averages income over a trailing [`LookbackWindow`] of whole months that
//! ends right before the reference month. Records are grouped into buckets (calendar
//! days, week numbers or month indices) and the target is the income total divided by
//! the number of distinct buckets that had at least one entry. An empty match yields a
//! target of `0.0`.

use std::{collections::HashSet, hash::Hash};

use tracing::debug;

use super::window::{LookbackWindow, WeekNumbering};
use crate::{
    ledger::{CalendarDate, Record},
    time::Clock,
};

/// A target together with the records that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport<'a> {
    pub target: f64,
    pub total: f64,
    /// Distinct days, weeks or months represented in `records`.
    pub buckets: usize,
    pub window: LookbackWindow,
    pub records: Vec<&'a Record>,
}

fn average_income<'a, K, M, B>(
    records: &'a [Record],
    window: LookbackWindow,
    matches: M,
    bucket: B,
) -> TargetReport<'a>
where
    K: Eq + Hash,
    M: Fn(&Record) -> bool,
    B: Fn(&Record) -> K,
{
    let contributing: Vec<&Record> = records
        .iter()
        .filter(|record| record.is_income())
        .filter(|record| window.contains(record.date))
        .filter(|record| matches(*record))
        .collect();

    let total: f64 = contributing.iter().map(|record| record.amount).sum();
    let buckets = contributing
        .iter()
        .map(|record| bucket(*record))
        .collect::<HashSet<K>>()
        .len();
    let target = if buckets == 0 {
        0.0
    } else {
        total / buckets as f64
    };

    TargetReport {
        target,
        total,
        buckets,
        window,
        records: contributing,
    }
}

/// Average income of the same weekday as `target_date` over the previous `months_back`
/// months, per distinct day.
pub fn daily_target_report(
    records: &[Record],
    months_back: u32,
    target_date: CalendarDate,
) -> TargetReport<'_> {
    let weekday = target_date.weekday();
    let window = LookbackWindow::new(target_date, months_back);
    average_income(
        records,
        window,
        |record| record.date.weekday() == weekday,
        |record| record.date,
    )
}

pub fn daily_target(records: &[Record], months_back: u32, target_date: CalendarDate) -> f64 {
    daily_target_report(records, months_back, target_date).target
}

/// Average income of the week number `today` falls in, per distinct week number.
///
/// Week numbers are not qualified by year: the lookback window is the only year
/// constraint.
pub fn weekly_target_report(
    records: &[Record],
    months_back: u32,
    today: CalendarDate,
    numbering: WeekNumbering,
) -> TargetReport<'_> {
    let week = numbering.week_of(today);
    let window = LookbackWindow::new(today, months_back);
    average_income(
        records,
        window,
        |record| numbering.week_of(record.date) == week,
        |record| numbering.week_of(record.date),
    )
}

pub fn weekly_target(
    records: &[Record],
    months_back: u32,
    today: CalendarDate,
    numbering: WeekNumbering,
) -> f64 {
    weekly_target_report(records, months_back, today, numbering).target
}

/// Average income of the month of year `today` falls in, per distinct month index.
pub fn monthly_target_report(
    records: &[Record],
    months_back: u32,
    today: CalendarDate,
) -> TargetReport<'_> {
    let month = today.month_index();
    let window = LookbackWindow::new(today, months_back);
    average_income(
        records,
        window,
        |record| record.date.month_index() == month,
        |record| record.date.month_index(),
    )
}

pub fn monthly_target(records: &[Record], months_back: u32, today: CalendarDate) -> f64 {
    monthly_target_report(records, months_back, today).target
}

/// Inputs shared by the three targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSettings {
    pub months_back: u32,
    pub week_numbering: WeekNumbering,
    /// Day the daily target is computed for; defaults to today.
    pub target_date: Option<CalendarDate>,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            months_back: 3,
            week_numbering: WeekNumbering::default(),
            target_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetSnapshot<'a> {
    pub today: CalendarDate,
    pub target_date: CalendarDate,
    pub daily: TargetReport<'a>,
    pub weekly: TargetReport<'a>,
    pub monthly: TargetReport<'a>,
}

/// Computes targets against the date supplied by a [`Clock`].
pub struct TargetService;

impl TargetService {
    pub fn daily(records: &[Record], months_back: u32, clock: &dyn Clock) -> f64 {
        daily_target(records, months_back, clock.today())
    }

    pub fn weekly(
        records: &[Record],
        months_back: u32,
        numbering: WeekNumbering,
        clock: &dyn Clock,
    ) -> f64 {
        weekly_target(records, months_back, clock.today(), numbering)
    }

    pub fn monthly(records: &[Record], months_back: u32, clock: &dyn Clock) -> f64 {
        monthly_target(records, months_back, clock.today())
    }

    pub fn snapshot<'a>(
        records: &'a [Record],
        settings: &TargetSettings,
        clock: &dyn Clock,
    ) -> TargetSnapshot<'a> {
        let today = clock.today();
        let target_date = settings.target_date.unwrap_or(today);
        let snapshot = TargetSnapshot {
            today,
            target_date,
            daily: daily_target_report(records, settings.months_back, target_date),
            weekly: weekly_target_report(
                records,
                settings.months_back,
                today,
                settings.week_numbering,
            ),
            monthly: monthly_target_report(records, settings.months_back, today),
        };
        debug!(
            daily = snapshot.daily.target,
            weekly = snapshot.weekly.target,
            monthly = snapshot.monthly.target,
            months_back = settings.months_back,
            "targets computed"
        );
        snapshot
    }
}
