use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    errors::StoreError,
    ledger::Record,
    utils::paths::{ensure_dir, tmp_path, write_atomic},
};

use super::{decode_snapshot, encode_snapshot, LoadReport, RecordStore, Result};

const BLOB_EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
pub const DEFAULT_RETENTION: usize = 5;

/// Keeps the snapshot for one key in `<root>/<key>.json`, with timestamped copies of
/// earlier snapshots under `<root>/backups/<key>/`.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    key: String,
    blob_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonRecordStore {
    pub fn new(root: impl Into<PathBuf>, key: &str) -> Result<Self> {
        Self::with_retention(root, key, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: impl Into<PathBuf>, key: &str, retention: usize) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        let key = canonical_name(key);
        Ok(Self {
            blob_path: root.join(format!("{}.{}", key, BLOB_EXTENSION)),
            backups_dir: root.join(BACKUP_DIR).join(&key),
            key,
            retention: retention.max(1),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.blob_path
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BLOB_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(file_name);
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    /// Copies a backup over the live snapshot and loads it.
    pub fn restore_backup(&self, backup_name: &str) -> Result<LoadReport> {
        let backup_path = self.backups_dir.join(backup_name);
        if backup_name.contains(['/', '\\']) || !backup_path.exists() {
            return Err(StoreError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let tmp = tmp_path(&self.blob_path);
        fs::copy(&backup_path, &tmp)?;
        fs::rename(&tmp, &self.blob_path)?;
        info!(key = %self.key, backup = backup_name, "snapshot restored from backup");
        self.load()
    }

    fn backup_existing_file(&self) -> Result<()> {
        if !self.blob_path.exists() {
            return Ok(());
        }
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!("{}_{}.{}", self.key, timestamp, BLOB_EXTENSION);
        fs::copy(&self.blob_path, self.backups_dir.join(&backup_name))?;
        debug!(key = %self.key, backup = %backup_name, "previous snapshot backed up");
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(entry));
        }
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn load(&self) -> Result<LoadReport> {
        if !self.blob_path.exists() {
            debug!(key = %self.key, "no snapshot on disk yet");
            return Ok(LoadReport::default());
        }
        let data = fs::read_to_string(&self.blob_path)?;
        let report = decode_snapshot(&data)?;
        debug!(
            key = %self.key,
            records = report.records.len(),
            skipped = report.skipped.len(),
            "snapshot loaded"
        );
        Ok(report)
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        self.backup_existing_file()?;
        let json = encode_snapshot(records)?;
        write_atomic(&self.blob_path, &json)?;
        debug!(key = %self.key, records = records.len(), "snapshot saved");
        Ok(())
    }
}

/// Lowercases a key and replaces anything outside `[a-z0-9]` with `_`.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "records".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(".json")?;
    let mut parts = stem.rsplitn(3, '_');
    let time_part = parts.next()?;
    let date_part = parts.next()?;
    parts.next()?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 4) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date_part}{time_part}"), "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CalendarDate, RecordId};
    use tempfile::TempDir;

    fn store_with_temp_dir(retention: usize) -> (JsonRecordStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store =
            JsonRecordStore::with_retention(temp.path(), "Expenses", retention).expect("store");
        (store, temp)
    }

    fn sample(id: &str) -> Record {
        let date = CalendarDate::parse("2025-01-07").expect("date");
        Record::income(120.0, date)
            .expect("income")
            .with_id(RecordId::from(id))
            .with_category("Sales")
    }

    #[test]
    fn missing_file_loads_empty() {
        let (store, _guard) = store_with_temp_dir(3);
        let report = store.load().expect("load");
        assert!(report.records.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (store, _guard) = store_with_temp_dir(3);
        assert_eq!(store.key(), "expenses");
        store.save(&[sample("a"), sample("b")]).expect("save");
        let report = store.load().expect("load");
        assert_eq!(report.records, vec![sample("a"), sample("b")]);
        assert!(!tmp_path(store.path()).exists());
    }

    #[test]
    fn overwriting_creates_backup() {
        let (store, _guard) = store_with_temp_dir(3);
        store.save(&[sample("a")]).expect("first save");
        assert!(store.list_backups().expect("list").is_empty());
        store.save(&[sample("b")]).expect("second save");
        let backups = store.list_backups().expect("list");
        assert_eq!(backups.len(), 1);
        assert!(backups[0].starts_with("expenses_"));

        let restored = store.restore_backup(&backups[0]).expect("restore");
        assert_eq!(restored.records, vec![sample("a")]);
    }

    #[test]
    fn old_backups_are_pruned() {
        let (store, temp) = store_with_temp_dir(2);
        let dir = temp.path().join("backups").join("expenses");
        fs::create_dir_all(&dir).expect("backup dir");
        for stamp in ["20240101_0900", "20240102_0900", "20240103_0900"] {
            fs::write(dir.join(format!("expenses_{stamp}.json")), "[]").expect("seed backup");
        }
        store.save(&[sample("a")]).expect("first save");
        store.save(&[sample("b")]).expect("second save");
        let backups = store.list_backups().expect("list");
        assert_eq!(backups.len(), 2);
        assert!(!backups.contains(&"expenses_20240101_0900.json".to_string()));
        assert!(!backups.contains(&"expenses_20240102_0900.json".to_string()));
    }

    #[test]
    fn unknown_backup_is_reported() {
        let (store, _guard) = store_with_temp_dir(2);
        assert!(matches!(
            store.restore_backup("nope.json"),
            Err(StoreError::Storage(_))
        ));
    }

    #[test]
    fn canonical_name_sanitizes() {
        assert_eq!(canonical_name("Loja Central"), "loja_central");
        assert_eq!(canonical_name("  "), "records");
    }
}
