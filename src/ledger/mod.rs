//! Record model: calendar dates, income/expense records and the mutable record book.

pub mod book;
pub mod date;
pub mod record;

pub use book::RecordBook;
pub use date::{parse_weekday, CalendarDate};
pub use record::{EntryType, Record, RecordId, RecordKind, StoredRecord};
