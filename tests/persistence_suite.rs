mod common;

use std::fs;

use common::{sample_records, setup_store, temp_base};
use grocer_core::{
    analysis::WeekNumbering,
    config::{Config, ConfigManager},
    ledger::{EntryType, RecordBook},
    storage::{MemoryRecordStore, RecordStore},
};

#[test]
fn snapshot_survives_a_save_load_cycle() {
    let (store, base) = setup_store();
    let records = sample_records();
    store.save(&records).expect("save");
    assert_eq!(store.path(), base.join("records").join("expenses.json"));

    let report = store.load().expect("load");
    assert!(report.is_clean());
    assert_eq!(report.records, records);
}

#[test]
fn malformed_entries_are_skipped_not_fatal() {
    let (store, _base) = setup_store();
    fs::create_dir_all(store.path().parent().expect("parent")).expect("records dir");
    fs::write(
        store.path(),
        r#"[
            {"id":"ok","amount":10,"type":"receita","date":"2025-01-07"},
            {"id":"bad-date","amount":10,"type":"despesa","date":"07/01/2025"},
            {"id":1700000000000,"amount":-3,"type":"income","date":"2025-01-07"},
            {"id":"old","amount":80,"type":"despesa","date":"2025-01-07","dueDate":"2025-01-20","paid":true}
        ]"#,
    )
    .expect("seed blob");

    let report = store.load().expect("load");
    let kinds: Vec<EntryType> = report.records.iter().map(|r| r.entry_type()).collect();
    assert_eq!(kinds, vec![EntryType::Income, EntryType::Expense]);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.skipped[0].id.as_deref(), Some("bad-date"));
    assert_eq!(report.skipped[1].id.as_deref(), Some("1700000000000"));
}

#[test]
fn numeric_legacy_ids_load_as_text() {
    let (store, _base) = setup_store();
    fs::create_dir_all(store.path().parent().expect("parent")).expect("records dir");
    fs::write(
        store.path(),
        r#"[{"id":17,"amount":5,"type":"despesa","date":"2025-01-08","dueDate":"2025-02-01"}]"#,
    )
    .expect("seed blob");

    let report = store.load().expect("load");
    assert!(report.is_clean());
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].id.as_str(), "17");
    assert_eq!(report.records[0].amount, 5.0);

    store.save(&report.records).expect("save");
    let saved = fs::read_to_string(store.path()).expect("read back");
    assert!(saved.contains("\"id\": \"17\""));
}

#[test]
fn a_blob_that_is_not_an_array_is_an_error() {
    let store = MemoryRecordStore::from_json(r#"{"records":[]}"#);
    assert!(store.load().is_err());
}

#[test]
fn book_mutations_round_trip_through_memory_store() {
    let store = MemoryRecordStore::new();
    let mut book = RecordBook::from_records(store.load().expect("empty").records);
    for record in sample_records() {
        book.add(record).expect("add");
    }
    book.toggle_paid(&"e1".into()).expect("toggle");
    store.save(book.records()).expect("save");

    let reloaded = RecordBook::from_records(store.load().expect("load").records);
    assert_eq!(reloaded, book);
    assert_eq!(reloaded.categories(), vec!["Sales", "Catering", "Supplier", "Rent"]);
}

#[test]
fn config_defaults_then_persists() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(&base).expect("manager");
    let mut config = manager.load().expect("defaults");
    assert_eq!(config, Config::default());

    config.set_months_back(6).expect("valid months");
    config.week_numbering = WeekNumbering::Sunday;
    manager.save(&config).expect("save");
    assert_eq!(manager.load().expect("reload"), config);

    assert!(config.set_months_back(0).is_err());
    fs::write(manager.path(), r#"{"months_back": 40}"#).expect("corrupt config");
    assert!(manager.load().is_err());
}
