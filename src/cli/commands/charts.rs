use crate::analysis::{
    category_breakdown, filter_pending, kind_totals, monthly_comparison, pending_breakdown,
    ChartFilter,
};
use crate::cli::commands::pending;
use crate::cli::core::{parse_months, CommandError, CommandResult, ParsedArgs, ShellContext};
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;
use crate::ledger::EntryType;

const BAR_WIDTH: usize = 30;
const DEFAULT_CHART_MONTHS: u32 = 6;
const MAX_CHART_MONTHS: u32 = 36;
const FILTER_OPTIONS: [&str; 4] = ["kind", "category", "from", "to"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "chart",
        "Draw text charts of income, expenses and payables",
        "chart monthly [--months N] | chart totals | chart categories [income|expense] | chart pending <day|week|month> [YYYY-MM-DD] [--weekday mon..sun] [--text T] | filters: --kind K --category C --from YYYY-MM-DD --to YYYY-MM-DD",
        cmd_chart,
    )]
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((view, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: chart <monthly|totals|categories|pending> [options]".into(),
        ));
    };
    match view.to_ascii_lowercase().as_str() {
        "monthly" => chart_monthly(context, rest),
        "totals" => chart_totals(context, rest),
        "categories" => chart_categories(context, rest),
        "pending" => chart_pending(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown chart `{}`",
            other
        ))),
    }
}

fn chart_filter(parsed: &ParsedArgs<'_>) -> Result<ChartFilter, CommandError> {
    Ok(ChartFilter {
        kind: parsed
            .value("kind")
            .map(str::parse::<EntryType>)
            .transpose()?,
        category: parsed
            .value("category")
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_string),
        start: parsed.date("from")?,
        end: parsed.date("to")?,
    })
}

fn chart_monthly(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut options = FILTER_OPTIONS.to_vec();
    options.push("months");
    let parsed = ParsedArgs::parse(args, &options, &[])?;
    let months = match parsed.value("months") {
        Some(raw) => parse_months(raw)?,
        None => DEFAULT_CHART_MONTHS,
    };
    if !(1..=MAX_CHART_MONTHS).contains(&months) {
        return Err(CommandError::InvalidArguments(format!(
            "months must be between 1 and {}",
            MAX_CHART_MONTHS
        )));
    }
    let filter = chart_filter(&parsed)?;
    let series = monthly_comparison(context.book.records(), context.today(), months, &filter);

    section(format!("Income vs expenses, last {} month(s)", months));
    let max = series
        .income
        .iter()
        .chain(&series.expense)
        .copied()
        .fold(0.0, f64::max);
    for ((month, income), (expense, balance)) in series
        .months
        .iter()
        .zip(&series.income)
        .zip(series.expense.iter().zip(series.balance()))
    {
        io::print_info(format!(
            "{}  in  {:<width$} {}",
            month,
            bar(*income, max),
            context.money(*income),
            width = BAR_WIDTH
        ));
        io::print_info(format!(
            "         out {:<width$} {}",
            bar(*expense, max),
            context.money(*expense),
            width = BAR_WIDTH
        ));
        io::print_info(format!("         net {}", context.money(balance)));
    }
    Ok(())
}

fn chart_totals(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FILTER_OPTIONS, &[])?;
    let filter = chart_filter(&parsed)?;
    let totals = kind_totals(context.book.records(), &filter);

    section("Income vs expenses");
    let Some((income_share, expense_share)) = totals.shares() else {
        io::print_info("No records match.");
        return Ok(());
    };
    let max = totals.income.max(totals.expense);
    io::print_info(format!(
        "Income   {:<width$} {} ({:.1}%)",
        bar(totals.income, max),
        context.money(totals.income),
        income_share,
        width = BAR_WIDTH
    ));
    io::print_info(format!(
        "Expenses {:<width$} {} ({:.1}%)",
        bar(totals.expense, max),
        context.money(totals.expense),
        expense_share,
        width = BAR_WIDTH
    ));
    io::print_info(format!("Balance: {}", context.money(totals.balance())));
    Ok(())
}

fn chart_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FILTER_OPTIONS, &[])?;
    let kind = match parsed.positional(0) {
        Some(raw) => raw.parse::<EntryType>()?,
        None => EntryType::Expense,
    };
    let filter = chart_filter(&parsed)?;
    let breakdown = category_breakdown(context.book.records(), kind, &filter);

    section(format!("{} by category", kind));
    if breakdown.is_empty() {
        io::print_info("No records match.");
        return Ok(());
    }
    let rows: Vec<(String, f64)> = breakdown
        .into_iter()
        .map(|entry| (entry.category, entry.total))
        .collect();
    print_bars(context, &rows);
    Ok(())
}

fn chart_pending(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &pending::FILTER_OPTIONS, &[])?;
    let filter = pending::parse_filter(context, &parsed)?;
    let summary = filter_pending(context.book.records(), &filter);

    section(format!("Pending expenses, {} {}", summary.period, summary.range));
    if summary.is_empty() {
        io::print_info("Nothing pending for this period.");
        return Ok(());
    }
    let rows: Vec<(String, f64)> = pending_breakdown(&summary)
        .into_iter()
        .map(|bucket| (bucket.label, bucket.total))
        .collect();
    print_bars(context, &rows);
    io::print_info(format!("Total: {}", context.money(summary.total)));
    Ok(())
}

fn print_bars(context: &ShellContext, rows: &[(String, f64)]) {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let max = rows.iter().map(|(_, total)| *total).fold(0.0, f64::max);
    for (label, total) in rows {
        let label: String = label.chars().take(label_width).collect();
        io::print_info(format!(
            "{:<label_width$}  {:<width$} {}",
            label,
            bar(*total, max),
            context.money(*total),
            label_width = label_width,
            width = BAR_WIDTH
        ));
    }
}

/// Bar of `#` scaled so that `max` fills the full width. Non-zero values get at least one mark.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.clamp(1, BAR_WIDTH))
}
