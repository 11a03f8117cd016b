use std::io::{self, Write};

use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use crate::{
    analysis::Period,
    ledger::{CalendarDate, Record},
};

pub const HEADER: [&str; 8] = [
    "id",
    "description",
    "category",
    "type",
    "amount",
    "date",
    "dueDate",
    "paid",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Export produced invalid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Writes the header and one quoted row per record.
///
/// Amounts carry two decimals; `paid` is `1`/`0` for expenses and empty for income.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    csv.write_record(HEADER)?;
    let mut rows = 0;
    for record in records {
        let amount = format!("{:.2}", record.amount);
        let date = record.date.to_string();
        let due_date = record
            .due_date()
            .map(|due| due.to_string())
            .unwrap_or_default();
        let paid = match record.paid() {
            Some(true) => "1",
            Some(false) => "0",
            None => "",
        };
        csv.write_record([
            record.id.as_str(),
            record.description.as_str(),
            record.category.as_str(),
            record.entry_type().as_str(),
            amount.as_str(),
            date.as_str(),
            due_date.as_str(),
            paid,
        ])?;
        rows += 1;
    }
    csv.flush()?;
    Ok(rows)
}

pub fn records_to_csv<'a, I>(records: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    Ok(String::from_utf8(buffer)?)
}

/// File name for a payables export, e.g. `pending_expenses_week_2025-11-29.csv`.
pub fn pending_export_file_name(period: Period, selected_date: CalendarDate) -> String {
    format!("pending_expenses_{}_{}.csv", period.as_str(), selected_date)
}
