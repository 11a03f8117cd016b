use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grocer_core::{
    analysis::{
        filter_pending, monthly_comparison, ChartFilter, Period, PendingFilter, TargetService,
        TargetSettings,
    },
    ledger::{CalendarDate, Record},
    storage::{JsonRecordStore, RecordStore},
    time::FixedClock,
};
use tempfile::tempdir;

fn build_sample_records(count: usize) -> Vec<Record> {
    let start = CalendarDate::parse("2024-01-01").expect("start date");
    (0..count)
        .map(|idx| {
            let date = start.add_days((idx % 540) as i64);
            let amount = 50.0 + (idx % 100) as f64;
            if idx % 3 == 0 {
                Record::expense(amount, date, Some(date.add_days(10)))
                    .expect("expense")
                    .with_paid(idx % 2 == 0)
                    .with_category("Supplier")
            } else {
                Record::income(amount, date)
                    .expect("income")
                    .with_category("Sales")
            }
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let records = build_sample_records(black_box(5_000));
    let today = CalendarDate::parse("2025-06-15").expect("today");
    let clock = FixedClock(today);
    let settings = TargetSettings {
        months_back: 12,
        ..TargetSettings::default()
    };

    c.bench_function("targets_snapshot_5k", |b| {
        b.iter(|| black_box(TargetService::snapshot(&records, &settings, &clock)))
    });

    let filter = PendingFilter::new(Period::Month, today).with_text("supplier");
    c.bench_function("pending_month_5k", |b| {
        b.iter(|| black_box(filter_pending(&records, &filter)))
    });

    c.bench_function("monthly_comparison_5k", |b| {
        b.iter(|| black_box(monthly_comparison(&records, today, 12, &ChartFilter::default())))
    });
}

fn bench_store_io(c: &mut Criterion) {
    let records = build_sample_records(black_box(5_000));
    let dir = tempdir().expect("tempdir");
    let store = JsonRecordStore::with_retention(dir.path(), "bench", 1).expect("store");

    c.bench_function("store_save_5k", |b| {
        b.iter(|| store.save(&records).expect("save"))
    });

    store.save(&records).expect("seed");
    c.bench_function("store_load_5k", |b| {
        b.iter(|| black_box(store.load().expect("load")))
    });
}

criterion_group!(benches, bench_aggregation, bench_store_io);
criterion_main!(benches);
