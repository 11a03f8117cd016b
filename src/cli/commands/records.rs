use crate::cli::core::{
    parse_amount, parse_date, CommandError, CommandResult, ParsedArgs, ShellContext,
};
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Column, Table};
use crate::ledger::{EntryType, Record, RecordKind};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an income or an expense",
            "add <income|expense> <amount> <YYYY-MM-DD> [--category C] [--description D] [--due YYYY-MM-DD] [--paid]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change fields of an existing record",
            "edit <id> [--amount A] [--date YYYY-MM-DD] [--category C] [--description D] [--due YYYY-MM-DD|none]",
            cmd_edit,
        ),
        CommandEntry::new(
            "list",
            "List records, newest first",
            "list [--kind income|expense] [--category C] [--limit N]",
            cmd_list,
        ),
        CommandEntry::new("delete", "Delete a record", "delete <id>", cmd_delete),
        CommandEntry::new(
            "toggle",
            "Flip the paid flag of an expense",
            "toggle <id>",
            cmd_toggle,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["category", "description", "due"], &["paid"])?;
    let (Some(kind), Some(amount), Some(date)) = (
        parsed.positional(0),
        parsed.positional(1),
        parsed.positional(2),
    ) else {
        return Err(CommandError::InvalidArguments(
            "usage: add <income|expense> <amount> <YYYY-MM-DD> [options]".into(),
        ));
    };
    let kind: EntryType = kind.parse()?;
    let amount = parse_amount(amount)?;
    let date = parse_date(date)?;
    let due = parsed.date("due")?;

    let record = match kind {
        EntryType::Income => {
            if due.is_some() || parsed.flag("paid") {
                return Err(CommandError::InvalidArguments(
                    "only expenses carry a due date or a paid flag".into(),
                ));
            }
            Record::income(amount, date)?
        }
        EntryType::Expense => Record::expense(amount, date, due)?.with_paid(parsed.flag("paid")),
    };
    let record = record
        .with_category(parsed.value("category").unwrap_or_default().trim())
        .with_description(parsed.value("description").unwrap_or_default().trim());

    let summary = format!("{} {} on {}", record.entry_type(), context.money(amount), date);
    let id = context.book.add(record)?;
    context.persist_records()?;
    io::print_success(format!("Added {} ({}).", summary, id.short()));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(
        args,
        &["amount", "date", "category", "description", "due"],
        &[],
    )?;
    let token = parsed
        .positional(0)
        .ok_or_else(|| CommandError::InvalidArguments("usage: edit <id> [options]".into()))?;
    let id = context.book.resolve(token)?;
    let mut record = context
        .book
        .get(&id)
        .cloned()
        .ok_or_else(|| CommandError::InvalidArguments(format!("record `{}` not found", token)))?;

    if let Some(amount) = parsed.value("amount") {
        record.amount = parse_amount(amount)?;
    }
    if let Some(date) = parsed.date("date")? {
        record.date = date;
    }
    if let Some(category) = parsed.value("category") {
        record.category = category.trim().to_string();
    }
    if let Some(description) = parsed.value("description") {
        record.description = description.trim().to_string();
    }
    if let Some(due) = parsed.value("due") {
        let RecordKind::Expense { due_date, .. } = &mut record.kind else {
            return Err(CommandError::InvalidArguments(
                "only expenses carry a due date".into(),
            ));
        };
        *due_date = match due.trim() {
            "none" | "-" | "" => None,
            raw => Some(parse_date(raw)?),
        };
    }

    context.book.update(&id, record)?;
    context.persist_records()?;
    io::print_success(format!("Record {} updated.", id.short()));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["kind", "category", "limit"], &[])?;
    let kind = parsed.value("kind").map(str::parse::<EntryType>).transpose()?;
    let limit = parsed
        .value("limit")
        .map(|raw| {
            raw.parse::<usize>()
                .map_err(|_| CommandError::InvalidArguments(format!("invalid limit `{}`", raw)))
        })
        .transpose()?;

    let records: Vec<&Record> = context
        .book
        .sorted_by_date_desc()
        .into_iter()
        .filter(|record| kind.map_or(true, |kind| record.entry_type() == kind))
        .filter(|record| {
            parsed
                .value("category")
                .map_or(true, |category| record.category == category)
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if records.is_empty() {
        io::print_warning("No records found.");
        return Ok(());
    }

    section("Records");
    io::print_block(&render_records(context, &records));
    io::print_info(format!("{} record(s)", records.len()));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let id = context.book.resolve(token)?;
    if !context.confirm(&format!("Delete record {}?", id.short()))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.book.remove(&id)?;
    context.persist_records()?;
    io::print_success(format!("Record {} deleted.", id.short()));
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(CommandError::InvalidArguments("usage: toggle <id>".into()));
    };
    let id = context.book.resolve(token)?;
    let paid = context.book.toggle_paid(&id)?;
    context.persist_records()?;
    let state = if paid { "paid" } else { "unpaid" };
    io::print_success(format!("Record {} marked as {}.", id.short(), state));
    Ok(())
}

fn status_label(record: &Record) -> String {
    match record.kind {
        RecordKind::Income => String::new(),
        RecordKind::Expense { paid: true, .. } => "paid".into(),
        RecordKind::Expense {
            due_date: Some(due),
            ..
        } => format!("due {}", due),
        RecordKind::Expense { .. } => "open".into(),
    }
}

/// Table shared by the record and payables listings.
pub(crate) fn render_records(context: &ShellContext, records: &[&Record]) -> String {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("DATE"),
        Column::left("TYPE"),
        Column::right("AMOUNT"),
        Column::left("CATEGORY").truncated(18),
        Column::left("DESCRIPTION").truncated(32),
        Column::left("STATUS"),
    ]);
    for record in records {
        table.push(vec![
            record.id.short().to_string(),
            record.date.to_string(),
            record.entry_type().to_string(),
            context.money(record.amount),
            record.category.clone(),
            record.description.clone(),
            status_label(record),
        ]);
    }
    table.render()
}
