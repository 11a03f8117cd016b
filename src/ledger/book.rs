use std::collections::HashSet;

use tracing::{debug, info};

use super::record::{Record, RecordId, RecordKind};
use crate::errors::{LedgerError, Result};

/// In-memory snapshot of every record plus the mutations applied to it before the
/// snapshot is written back to a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBook {
    records: Vec<Record>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| LedgerError::RecordNotFound(id.to_string()))
    }

    pub fn add(&mut self, record: Record) -> Result<RecordId> {
        record.validate()?;
        if self.get(&record.id).is_some() {
            return Err(LedgerError::DuplicateRecord(record.id.to_string()));
        }
        let id = record.id.clone();
        debug!(id = %id, kind = %record.entry_type(), amount = record.amount, "record added");
        self.records.push(record);
        Ok(id)
    }

    /// Replaces the record stored under `id`. The id itself never changes.
    pub fn update(&mut self, id: &RecordId, mut record: Record) -> Result<()> {
        let idx = self.position(id)?;
        record.id = id.clone();
        record.validate()?;
        self.records[idx] = record;
        Ok(())
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<Record> {
        let idx = self.position(id)?;
        Ok(self.records.remove(idx))
    }

    /// Flips the paid flag of an expense and returns the new state.
    pub fn toggle_paid(&mut self, id: &RecordId) -> Result<bool> {
        let idx = self.position(id)?;
        match &mut self.records[idx].kind {
            RecordKind::Expense { paid, .. } => {
                *paid = !*paid;
                Ok(*paid)
            }
            RecordKind::Income => Err(not_an_expense(id)),
        }
    }

    /// Marks every listed expense as paid. Either all ids resolve to expenses and the
    /// change is applied, or nothing is touched. Returns how many records changed.
    pub fn mark_paid<'a, I>(&mut self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        let mut targets = Vec::new();
        for id in ids {
            let idx = self.position(id)?;
            if !self.records[idx].is_expense() {
                return Err(not_an_expense(id));
            }
            targets.push(idx);
        }

        let mut changed = 0;
        for idx in targets {
            if let RecordKind::Expense { paid, .. } = &mut self.records[idx].kind {
                if !*paid {
                    *paid = true;
                    changed += 1;
                }
            }
        }
        info!(changed, "expenses marked as paid");
        Ok(changed)
    }

    /// Resolves a full id or an unambiguous id prefix.
    pub fn resolve(&self, token: &str) -> Result<RecordId> {
        let token = token.trim();
        if token.is_empty() {
            return Err(LedgerError::RecordNotFound(String::new()));
        }
        if let Some(record) = self.records.iter().find(|r| r.id.as_str() == token) {
            return Ok(record.id.clone());
        }
        let mut matches = self
            .records
            .iter()
            .filter(|record| record.id.as_str().starts_with(token));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record.id.clone()),
            (Some(_), Some(_)) => Err(LedgerError::InvalidRecord(format!(
                "id prefix `{token}` matches more than one record"
            ))),
            (None, _) => Err(LedgerError::RecordNotFound(token.to_string())),
        }
    }

    /// Newest first; ties keep insertion order.
    pub fn sorted_by_date_desc(&self) -> Vec<&Record> {
        let mut sorted: Vec<&Record> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Distinct non-empty categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.category.as_str())
            .filter(|category| !category.is_empty() && seen.insert(*category))
            .collect()
    }
}

fn not_an_expense(id: &RecordId) -> LedgerError {
    LedgerError::InvalidRecord(format!("record {id} is not an expense"))
}
