mod common;

use common::{date, income};
use grocer_core::{
    analysis::{
        daily_target, daily_target_report, monthly_target, weekly_target, TargetService,
        TargetSettings, WeekNumbering,
    },
    ledger::Record,
    time::FixedClock,
};

#[test]
fn daily_target_matches_documented_example() {
    let records = vec![
        income("a", "2025-01-07", 100.0),
        income("b", "2025-02-04", 200.0),
    ];
    let report = daily_target_report(&records, 2, date("2025-03-04"));
    assert_eq!(report.window.start, date("2025-01-01"));
    assert_eq!(report.window.end, date("2025-03-01"));
    assert_eq!(report.buckets, 2);
    assert_eq!(report.target, 150.0);
}

#[test]
fn empty_snapshot_yields_zero_targets() {
    let records: Vec<Record> = Vec::new();
    let today = date("2025-03-04");
    assert_eq!(daily_target(&records, 3, today), 0.0);
    assert_eq!(weekly_target(&records, 3, today, WeekNumbering::Iso), 0.0);
    assert_eq!(monthly_target(&records, 3, today), 0.0);
}

#[test]
fn weekly_target_matches_week_number_across_years() {
    let records = vec![
        income("a", "2024-03-12", 70.0),
        income("b", "2024-03-13", 30.0),
        income("c", "2025-01-15", 500.0),
    ];
    assert_eq!(
        weekly_target(&records, 12, date("2025-03-12"), WeekNumbering::Iso),
        100.0
    );
}

#[test]
fn week_numbering_changes_the_reference_week() {
    let records = vec![income("a", "2024-01-01", 60.0), income("b", "2024-01-07", 40.0)];
    let clock = FixedClock(date("2025-01-05"));
    assert_eq!(
        TargetService::weekly(&records, 12, WeekNumbering::Iso, &clock),
        100.0
    );
    assert_eq!(
        TargetService::weekly(&records, 12, WeekNumbering::Sunday, &clock),
        40.0
    );
}

#[test]
fn monthly_target_uses_same_month_of_previous_year() {
    let records = vec![
        income("a", "2024-03-05", 100.0),
        income("b", "2024-03-20", 50.0),
        income("c", "2025-02-10", 999.0),
        income("d", "2025-03-02", 999.0),
    ];
    assert_eq!(monthly_target(&records, 12, date("2025-03-04")), 150.0);
    assert_eq!(monthly_target(&records, 11, date("2025-03-04")), 0.0);
}

#[test]
fn snapshot_reports_contributing_records() {
    let records = vec![
        income("a", "2025-01-07", 100.0),
        income("b", "2025-02-04", 200.0),
        income("c", "2025-02-05", 10.0),
    ];
    let clock = FixedClock(date("2025-03-04"));
    let settings = TargetSettings {
        months_back: 2,
        ..TargetSettings::default()
    };
    let snapshot = TargetService::snapshot(&records, &settings, &clock);
    let ids: Vec<&str> = snapshot
        .daily
        .records
        .iter()
        .map(|record| record.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(snapshot.target_date, date("2025-03-04"));
    assert_eq!(snapshot.monthly.target, 0.0);
}
