use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::CalendarDate;
use crate::errors::{LedgerError, Result};

/// Opaque record identifier. New ids are UUIDs; ids from older data are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to tell records apart in listings.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Serialized record tag. The legacy Portuguese tags are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[serde(alias = "receita")]
    Income,
    #[serde(alias = "despesa")]
    Expense,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "receita" => Ok(EntryType::Income),
            "expense" | "despesa" => Ok(EntryType::Expense),
            other => Err(LedgerError::InvalidRecord(format!(
                "unknown record type `{other}`"
            ))),
        }
    }
}

/// Payment details only exist for expenses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordKind {
    Income,
    Expense {
        due_date: Option<CalendarDate>,
        paid: bool,
    },
}

impl RecordKind {
    pub fn entry_type(&self) -> EntryType {
        match self {
            RecordKind::Income => EntryType::Income,
            RecordKind::Expense { .. } => EntryType::Expense,
        }
    }
}

/// One income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord", into = "StoredRecord")]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    pub amount: f64,
    pub date: CalendarDate,
    pub category: String,
    pub description: String,
}

impl Record {
    pub fn income(amount: f64, date: CalendarDate) -> Result<Self> {
        Self::build(RecordKind::Income, amount, date)
    }

    /// Unpaid expense, optionally due on `due_date`.
    pub fn expense(
        amount: f64,
        date: CalendarDate,
        due_date: Option<CalendarDate>,
    ) -> Result<Self> {
        Self::build(
            RecordKind::Expense {
                due_date,
                paid: false,
            },
            amount,
            date,
        )
    }

    fn build(kind: RecordKind, amount: f64, date: CalendarDate) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            id: RecordId::generate(),
            kind,
            amount,
            date,
            category: String::new(),
            description: String::new(),
        })
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the paid flag; has no effect on income.
    pub fn with_paid(mut self, value: bool) -> Self {
        if let RecordKind::Expense { paid, .. } = &mut self.kind {
            *paid = value;
        }
        self
    }

    pub fn entry_type(&self) -> EntryType {
        self.kind.entry_type()
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, RecordKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, RecordKind::Expense { .. })
    }

    pub fn due_date(&self) -> Option<CalendarDate> {
        match self.kind {
            RecordKind::Expense { due_date, .. } => due_date,
            RecordKind::Income => None,
        }
    }

    /// `None` for income.
    pub fn paid(&self) -> Option<bool> {
        match self.kind {
            RecordKind::Expense { paid, .. } => Some(paid),
            RecordKind::Income => None,
        }
    }

    /// Due date of an unpaid expense that has one.
    pub fn pending_due_date(&self) -> Option<CalendarDate> {
        match self.kind {
            RecordKind::Expense {
                due_date: Some(due),
                paid: false,
            } => Some(due),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        if self.id.as_str().trim().is_empty() {
            return Err(LedgerError::InvalidRecord("record id is empty".into()));
        }
        Ok(())
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}

/// Wire shape of a record, matching the JSON blobs kept by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub category: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
}

/// Older snapshots stored timestamp ids as bare JSON numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

impl TryFrom<StoredRecord> for Record {
    type Error = LedgerError;

    fn try_from(stored: StoredRecord) -> Result<Self> {
        let date = CalendarDate::parse(&stored.date)?;
        let kind = match stored.entry_type {
            EntryType::Income => RecordKind::Income,
            EntryType::Expense => {
                let due_date = match stored.due_date.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(raw) => Some(CalendarDate::parse(raw)?),
                };
                RecordKind::Expense {
                    due_date,
                    paid: stored.paid.unwrap_or(false),
                }
            }
        };
        let record = Record {
            id: RecordId::new(stored.id),
            kind,
            amount: stored.amount,
            date,
            category: stored.category,
            description: stored.description,
        };
        record.validate()?;
        Ok(record)
    }
}

impl From<Record> for StoredRecord {
    fn from(record: Record) -> Self {
        let (due_date, paid) = match record.kind {
            RecordKind::Income => (None, None),
            RecordKind::Expense { due_date, paid } => {
                (due_date.map(|date| date.to_string()), Some(paid))
            }
        };
        StoredRecord {
            id: record.id.0,
            description: record.description,
            amount: record.amount,
            entry_type: record.kind.entry_type(),
            category: record.category,
            date: record.date.to_string(),
            due_date,
            paid,
        }
    }
}
