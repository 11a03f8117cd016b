//! Record stores: a full snapshot of every record saved and loaded under one key.

pub mod json_backend;
pub mod memory;

use serde_json::Value;
use tracing::warn;

use crate::{
    errors::StoreError,
    ledger::{Record, StoredRecord},
};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence seam for record snapshots.
pub trait RecordStore: Send + Sync {
    /// Loads the stored snapshot. A missing snapshot is an empty one.
    fn load(&self) -> Result<LoadReport>;
    /// Replaces the stored snapshot with `records`.
    fn save(&self, records: &[Record]) -> Result<()>;
}

/// Records recovered from a snapshot together with the entries that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the entry in the stored array.
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Decodes a JSON array of records, skipping entries that do not form a valid record.
///
/// Only a blob that is not a JSON array at all is an error.
pub fn decode_snapshot(raw: &str) -> Result<LoadReport> {
    if raw.trim().is_empty() {
        return Ok(LoadReport::default());
    }
    let entries: Vec<Value> = serde_json::from_str(raw)?;
    let mut report = LoadReport::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(|value| match value {
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            });
        let decoded = serde_json::from_value::<StoredRecord>(entry)
            .map_err(|err| err.to_string())
            .and_then(|stored| Record::try_from(stored).map_err(|err| err.to_string()));
        match decoded {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                warn!(index, id = ?id, %reason, "skipping malformed record");
                report.skipped.push(SkippedRecord { index, id, reason });
            }
        }
    }
    Ok(report)
}

pub fn encode_snapshot(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub use json_backend::JsonRecordStore;
pub use memory::MemoryRecordStore;
