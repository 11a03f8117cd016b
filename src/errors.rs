use thiserror::Error;

/// Failures raised while building or mutating ledger records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),
    #[error("Invalid period `{0}` (expected day, week or month)")]
    InvalidPeriod(String),
    #[error("Invalid weekday `{0}`")]
    InvalidWeekday(String),
    #[error("Invalid amount {0}: amounts must be finite and non-negative")]
    InvalidAmount(f64),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("Duplicate record id: {0}")]
    DuplicateRecord(String),
}

/// Failures raised by record store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
