#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use grocer_core::{
    ledger::{CalendarDate, Record, RecordId},
    storage::JsonRecordStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated JSON store keyed like the application's default snapshot.
pub fn setup_store() -> (JsonRecordStore, PathBuf) {
    let base = temp_base();
    let store = JsonRecordStore::new(base.join("records"), "expenses").expect("create json store");
    (store, base)
}

pub fn date(raw: &str) -> CalendarDate {
    CalendarDate::parse(raw).expect("valid date")
}

pub fn income(id: &str, on: &str, amount: f64) -> Record {
    Record::income(amount, date(on))
        .expect("income")
        .with_id(RecordId::from(id))
}

pub fn expense(id: &str, due: &str, amount: f64, paid: bool) -> Record {
    Record::expense(amount, date(due), Some(date(due)))
        .expect("expense")
        .with_id(RecordId::from(id))
        .with_paid(paid)
}

/// A few months of store activity around November 2025.
pub fn sample_records() -> Vec<Record> {
    vec![
        income("i1", "2025-09-02", 420.0).with_category("Sales"),
        income("i2", "2025-10-07", 380.0).with_category("Sales"),
        income("i3", "2025-10-14", 200.0).with_category("Catering"),
        expense("e1", "2025-11-29", 50.0, false)
            .with_category("Supplier")
            .with_description("Fresh produce"),
        expense("e2", "2025-11-29", 70.0, true).with_category("Supplier"),
        expense("e3", "2025-11-24", 120.0, false)
            .with_category("Rent")
            .with_description("Shop rent"),
        expense("e4", "2025-12-01", 35.0, false).with_description("Electricity"),
    ]
}
