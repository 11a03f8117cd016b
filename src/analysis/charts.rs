//! Chart series: monthly income against expenses, per-category totals and the
//! payables breakdown shown next to the pending list.

use std::collections::HashMap;

use chrono::Weekday;

use super::pending::{Period, PendingSummary};
use crate::ledger::{CalendarDate, EntryType, Record};

pub const UNCATEGORIZED: &str = "Uncategorized";

const WEEK_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Record selection shared by every chart. Unset fields match everything; dates are
/// inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartFilter {
    pub kind: Option<EntryType>,
    pub category: Option<String>,
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

impl ChartFilter {
    pub fn matches(&self, record: &Record) -> bool {
        if self.kind.is_some_and(|kind| record.entry_type() != kind) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| record.category != category)
        {
            return false;
        }
        if self.start.is_some_and(|start| record.date < start) {
            return false;
        }
        if self.end.is_some_and(|end| record.date > end) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    /// `YYYY-MM` keys, oldest first.
    pub months: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
}

impl MonthlySeries {
    pub fn balance(&self) -> Vec<f64> {
        self.income
            .iter()
            .zip(&self.expense)
            .map(|(income, expense)| round_cents(income - expense))
            .collect()
    }
}

/// Income and expense totals for the last `months` months ending with the month of
/// `today`.
pub fn monthly_comparison(
    records: &[Record],
    today: CalendarDate,
    months: u32,
    filter: &ChartFilter,
) -> MonthlySeries {
    let current = today.start_of_month();
    let keys: Vec<String> = (0..months)
        .rev()
        .filter_map(|back| current.shift_months(-(back as i32)))
        .map(CalendarDate::month_key)
        .collect();

    let mut slots: HashMap<&str, (f64, f64)> =
        keys.iter().map(|key| (key.as_str(), (0.0, 0.0))).collect();
    for record in records.iter().filter(|record| filter.matches(record)) {
        let key = record.date.month_key();
        if let Some((income, expense)) = slots.get_mut(key.as_str()) {
            if record.is_income() {
                *income += record.amount;
            } else {
                *expense += record.amount;
            }
        }
    }

    let (income, expense): (Vec<f64>, Vec<f64>) = keys
        .iter()
        .map(|key| slots.get(key.as_str()).copied().unwrap_or_default())
        .map(|(income, expense)| (round_cents(income), round_cents(expense)))
        .unzip();
    MonthlySeries {
        months: keys,
        income,
        expense,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KindTotals {
    pub income: f64,
    pub expense: f64,
}

impl KindTotals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }

    /// Share of each kind in percent, `None` when both totals are zero.
    pub fn shares(&self) -> Option<(f64, f64)> {
        let total = self.income + self.expense;
        (total > 0.0).then(|| {
            (
                round_cents(self.income / total * 100.0),
                round_cents(self.expense / total * 100.0),
            )
        })
    }
}

pub fn kind_totals(records: &[Record], filter: &ChartFilter) -> KindTotals {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .fold(KindTotals::default(), |mut totals, record| {
            if record.is_income() {
                totals.income += record.amount;
            } else {
                totals.expense += record.amount;
            }
            totals
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Per-category totals for one kind, in order of first appearance.
pub fn category_breakdown(
    records: &[Record],
    kind: EntryType,
    filter: &ChartFilter,
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for record in records
        .iter()
        .filter(|record| record.entry_type() == kind && filter.matches(record))
    {
        let label = if record.category.trim().is_empty() {
            UNCATEGORIZED
        } else {
            record.category.as_str()
        };
        match totals.iter_mut().find(|entry| entry.category == label) {
            Some(entry) => entry.total += record.amount,
            None => totals.push(CategoryTotal {
                category: label.to_string(),
                total: record.amount,
            }),
        }
    }
    totals
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingBucket {
    pub label: String,
    pub total: f64,
}

/// Buckets for the payables chart: one bar per item for a day, one per day of month
/// for a month, and Monday through Sunday for a week.
pub fn pending_breakdown(summary: &PendingSummary<'_>) -> Vec<PendingBucket> {
    match summary.period {
        Period::Day => summary
            .records
            .iter()
            .map(|record| PendingBucket {
                label: if record.description.trim().is_empty() {
                    record.id.to_string()
                } else {
                    record.description.clone()
                },
                total: record.amount,
            })
            .collect(),
        Period::Month => {
            let mut days: Vec<(u32, f64)> = Vec::new();
            for record in &summary.records {
                let Some(due) = record.due_date() else {
                    continue;
                };
                match days.iter_mut().find(|(day, _)| *day == due.day()) {
                    Some((_, total)) => *total += record.amount,
                    None => days.push((due.day(), record.amount)),
                }
            }
            days.sort_by_key(|(day, _)| *day);
            days.into_iter()
                .map(|(day, total)| PendingBucket {
                    label: format!("{day:02}"),
                    total,
                })
                .collect()
        }
        Period::Week => {
            let mut totals = [0.0; 7];
            for record in &summary.records {
                if let Some(due) = record.due_date() {
                    totals[weekday_slot(due.weekday())] += record.amount;
                }
            }
            WEEK_LABELS
                .iter()
                .zip(totals)
                .map(|(label, total)| PendingBucket {
                    label: (*label).to_string(),
                    total,
                })
                .collect()
        }
    }
}

fn weekday_slot(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pending::{filter_pending, PendingFilter};

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).expect("valid date")
    }

    fn income(on: &str, amount: f64) -> Record {
        Record::income(amount, date(on)).expect("income")
    }

    fn expense(on: &str, amount: f64) -> Record {
        Record::expense(amount, date(on), None).expect("expense")
    }

    fn due(on: &str, amount: f64, description: &str) -> Record {
        Record::expense(amount, date("2025-01-01"), Some(date(on)))
            .expect("expense")
            .with_description(description)
    }

    #[test]
    fn monthly_comparison_covers_trailing_months() {
        let records = vec![
            income("2025-01-10", 100.004),
            income("2025-03-01", 50.0),
            expense("2025-03-15", 20.0),
            expense("2024-12-31", 999.0),
        ];
        let series = monthly_comparison(&records, date("2025-03-20"), 3, &ChartFilter::default());
        assert_eq!(series.months, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(series.income, vec![100.0, 0.0, 50.0]);
        assert_eq!(series.expense, vec![0.0, 0.0, 20.0]);
        assert_eq!(series.balance(), vec![100.0, 0.0, 30.0]);
    }

    #[test]
    fn chart_filter_applies_kind_category_and_dates() {
        let records = vec![
            income("2025-02-01", 10.0).with_category("Sales"),
            income("2025-02-10", 20.0),
            expense("2025-02-05", 5.0).with_category("Sales"),
            income("2025-03-01", 40.0).with_category("Sales"),
        ];
        let filter = ChartFilter {
            kind: Some(EntryType::Income),
            category: Some("Sales".into()),
            start: Some(date("2025-02-01")),
            end: Some(date("2025-02-28")),
        };
        let totals = kind_totals(&records, &filter);
        assert_eq!(totals, KindTotals { income: 10.0, expense: 0.0 });
    }

    #[test]
    fn kind_shares_are_percentages() {
        let totals = KindTotals { income: 75.0, expense: 25.0 };
        assert_eq!(totals.shares(), Some((75.0, 25.0)));
        assert_eq!(KindTotals::default().shares(), None);
    }

    #[test]
    fn category_breakdown_labels_blank_categories() {
        let records = vec![
            expense("2025-02-01", 10.0).with_category("Rent"),
            expense("2025-02-02", 5.0),
            expense("2025-02-03", 2.5).with_category("Rent"),
            income("2025-02-03", 99.0).with_category("Sales"),
        ];
        let breakdown = category_breakdown(&records, EntryType::Expense, &ChartFilter::default());
        assert_eq!(
            breakdown,
            vec![
                CategoryTotal { category: "Rent".into(), total: 12.5 },
                CategoryTotal { category: UNCATEGORIZED.into(), total: 5.0 },
            ]
        );
    }

    #[test]
    fn week_breakdown_has_seven_buckets() {
        let records = vec![due("2025-11-24", 10.0, "a"), due("2025-11-30", 5.0, "b")];
        let summary = filter_pending(&records, &PendingFilter::new(Period::Week, date("2025-11-26")));
        let buckets = pending_breakdown(&summary);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0], PendingBucket { label: "Mon".into(), total: 10.0 });
        assert_eq!(buckets[6], PendingBucket { label: "Sun".into(), total: 5.0 });
        assert_eq!(buckets[3].total, 0.0);
    }

    #[test]
    fn month_breakdown_groups_by_day_of_month() {
        let records = vec![
            due("2025-11-20", 10.0, "a"),
            due("2025-11-03", 5.0, "b"),
            due("2025-11-20", 1.0, "c"),
        ];
        let summary =
            filter_pending(&records, &PendingFilter::new(Period::Month, date("2025-11-01")));
        let labels: Vec<(String, f64)> = pending_breakdown(&summary)
            .into_iter()
            .map(|bucket| (bucket.label, bucket.total))
            .collect();
        assert_eq!(labels, vec![("03".to_string(), 5.0), ("20".to_string(), 11.0)]);
    }

    #[test]
    fn day_breakdown_lists_items() {
        let records = vec![due("2025-11-29", 50.0, "Supplier"), due("2025-11-29", 7.0, "")];
        let summary = filter_pending(&records, &PendingFilter::new(Period::Day, date("2025-11-29")));
        let buckets = pending_breakdown(&summary);
        assert_eq!(buckets[0].label, "Supplier");
        assert_eq!(buckets[1].label, records[1].id.to_string());
    }
}
