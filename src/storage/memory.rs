use std::sync::Mutex;

use crate::{errors::StoreError, ledger::Record};

use super::{decode_snapshot, encode_snapshot, LoadReport, RecordStore, Result};

/// Store that keeps the serialized snapshot in process memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    blob: Mutex<String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw JSON blob, as left behind by another writer.
    pub fn from_json(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(raw.into()),
        }
    }

    pub fn raw(&self) -> Result<String> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, String>> {
        self.blob
            .lock()
            .map_err(|_| StoreError::Storage("memory store lock poisoned".into()))
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> Result<LoadReport> {
        decode_snapshot(&self.lock()?)
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let json = encode_snapshot(records)?;
        *self.lock()? = json;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CalendarDate;

    #[test]
    fn saves_replace_the_snapshot() {
        let store = MemoryRecordStore::new();
        assert!(store.load().expect("empty").records.is_empty());
        let date = CalendarDate::parse("2025-02-01").expect("date");
        let record = Record::expense(30.0, date, Some(date)).expect("expense");
        store.save(std::slice::from_ref(&record)).expect("save");
        assert_eq!(store.load().expect("load").records, vec![record]);
        store.save(&[]).expect("clear");
        assert!(store.load().expect("load").records.is_empty());
        assert_eq!(store.raw().expect("raw").trim(), "[]");
    }

    #[test]
    fn seeded_blob_reports_skipped_entries() {
        let store = MemoryRecordStore::from_json(
            r#"[{"id":"x","amount":1,"type":"receita","date":"2025-13-01"}]"#,
        );
        let report = store.load().expect("load");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id.as_deref(), Some("x"));
    }
}
