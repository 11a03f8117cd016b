//! Exports of record subsets.

pub mod csv;

pub use self::csv::{pending_export_file_name, records_to_csv, write_records, ExportError};
