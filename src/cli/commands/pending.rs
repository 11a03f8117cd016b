use std::{fs::File, io::BufWriter, path::PathBuf};

use tracing::info;

use crate::analysis::{filter_pending, Period, PendingFilter};
use crate::cli::commands::records::render_records;
use crate::cli::core::{parse_date, CommandError, CommandResult, ParsedArgs, ShellContext};
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;
use crate::export::{pending_export_file_name, write_records};
use crate::ledger::parse_weekday;

pub(crate) const FILTER_OPTIONS: [&str; 3] = ["category", "weekday", "text"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "pending",
            "List unpaid expenses due in a day, week or month",
            "pending <day|week|month> [YYYY-MM-DD] [--category C] [--weekday mon..sun] [--text T]",
            cmd_pending,
        ),
        CommandEntry::new(
            "pay",
            "Mark every pending expense of a period as paid",
            "pay <day|week|month> [YYYY-MM-DD] [--category C] [--weekday mon..sun] [--text T]",
            cmd_pay,
        ),
        CommandEntry::new(
            "export",
            "Write the pending expenses of a period to CSV",
            "export <day|week|month> [YYYY-MM-DD] [--out PATH] [--category C] [--weekday mon..sun] [--text T]",
            cmd_export,
        ),
    ]
}

/// Reads `<period> [date]` plus the secondary filters; the date defaults to today.
pub(crate) fn parse_filter(
    context: &ShellContext,
    parsed: &ParsedArgs<'_>,
) -> Result<PendingFilter, CommandError> {
    let period: Period = parsed
        .positional(0)
        .ok_or_else(|| {
            CommandError::InvalidArguments("a period is required: day, week or month".into())
        })?
        .parse()?;
    let selected = match parsed.positional(1) {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };
    if let Some(extra) = parsed.positional(2) {
        return Err(CommandError::InvalidArguments(format!(
            "unexpected argument `{}`",
            extra
        )));
    }

    let mut filter = PendingFilter::new(period, selected);
    if let Some(category) = parsed.value("category") {
        filter = filter.with_category(category.trim());
    }
    if let Some(weekday) = parsed.value("weekday") {
        filter = filter.with_weekday(parse_weekday(weekday)?);
    }
    if let Some(text) = parsed.value("text") {
        filter = filter.with_text(text);
    }
    Ok(filter)
}

fn cmd_pending(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FILTER_OPTIONS, &[])?;
    let filter = parse_filter(context, &parsed)?;
    let summary = filter_pending(context.book.records(), &filter);

    section(format!("Pending expenses, {} {}", summary.period, summary.range));
    if summary.is_empty() {
        io::print_info("Nothing pending for this period.");
        return Ok(());
    }
    io::print_block(&render_records(context, &summary.records));
    io::print_info(format!(
        "{} expense(s), total {}",
        summary.count,
        context.money(summary.total)
    ));
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FILTER_OPTIONS, &[])?;
    let filter = parse_filter(context, &parsed)?;
    let summary = filter_pending(context.book.records(), &filter);
    if summary.is_empty() {
        io::print_info("Nothing pending for this period.");
        return Ok(());
    }
    let ids = summary.ids();
    let prompt = format!(
        "Mark {} expense(s) totalling {} as paid?",
        summary.count,
        context.money(summary.total)
    );
    if !context.confirm(&prompt)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let changed = context.book.mark_paid(&ids)?;
    context.persist_records()?;
    io::print_success(format!("{} expense(s) marked as paid.", changed));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut options = FILTER_OPTIONS.to_vec();
    options.push("out");
    let parsed = ParsedArgs::parse(args, &options, &[])?;
    let filter = parse_filter(context, &parsed)?;
    let summary = filter_pending(context.book.records(), &filter);
    if summary.is_empty() {
        io::print_warning("Nothing pending for this period; no file written.");
        return Ok(());
    }

    let path = parsed.value("out").map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(pending_export_file_name(filter.period, filter.selected_date))
    });
    let file = File::create(&path)?;
    let rows = write_records(BufWriter::new(file), summary.records.iter().copied())?;
    info!(rows, path = %path.display(), "pending expenses exported");
    io::print_success(format!("Exported {} expense(s) to {}", rows, path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::cli::core::{run_lines, script_context};
    use tempfile::tempdir;

    fn seeded(dir: &std::path::Path) -> crate::cli::core::ShellContext {
        let mut context = script_context(dir, "2025-11-26");
        run_lines(
            &mut context,
            &[
                "add expense 50 2025-11-20 --due 2025-11-29 --description \"Supplier A\"",
                "add expense 30 2025-11-20 --due 2025-11-30 --category Rent",
                "add expense 20 2025-11-20 --due 2025-12-01",
                "add expense 10 2025-11-20",
            ],
        );
        context
    }

    #[test]
    fn pay_marks_only_the_filtered_period() {
        let dir = tempdir().expect("temp dir");
        let mut context = seeded(dir.path());
        run_lines(&mut context, &["pending week", "pay week --category Rent"]);
        let paid: Vec<f64> = context
            .book
            .records()
            .iter()
            .filter(|record| record.paid() == Some(true))
            .map(|record| record.amount)
            .collect();
        assert_eq!(paid, vec![30.0]);

        run_lines(&mut context, &["pay week"]);
        let unpaid = context
            .book
            .records()
            .iter()
            .filter(|record| record.paid() == Some(false))
            .count();
        assert_eq!(unpaid, 2);
    }

    #[test]
    fn export_writes_requested_file() {
        let dir = tempdir().expect("temp dir");
        let mut context = seeded(dir.path());
        let out = dir.path().join("week.csv");
        let line = format!("export week 2025-11-26 --out {}", out.display());
        run_lines(&mut context, &[line.as_str()]);

        let written = fs::read_to_string(&out).expect("csv written");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"Supplier A\""));
        assert!(lines[2].contains("\"Rent\""));
    }

    #[test]
    fn period_is_required_and_checked() {
        let dir = tempdir().expect("temp dir");
        let mut context = seeded(dir.path());
        assert!(context.process_line("pending").is_err());
        assert!(context.process_line("pending year").is_err());
        assert!(context.process_line("pending day --weekday funday").is_err());
    }
}
