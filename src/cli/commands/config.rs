use crate::analysis::WeekNumbering;
use crate::cli::core::{parse_months, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;
use crate::config::MONTHS_BACK_CHOICES;
use crate::currency::symbol_for;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "View and change preferences",
            "config [show|months <N>|weeks <iso|sunday>|currency <ISO>]",
            cmd_config,
        ),
        CommandEntry::new(
            "backup",
            "List or restore record snapshots",
            "backup [list|restore <name>]",
            cmd_backup,
        ),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    let value = args.get(1).copied();
    match args[0].to_lowercase().as_str() {
        "months" => {
            let months = value.ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "usage: config months <N> (suggested: {})",
                    months_choices()
                ))
            })?;
            context.config.set_months_back(parse_months(months)?)?;
            context.persist_config()?;
            io::print_success(format!(
                "Targets now look back {} month(s).",
                context.config.months_back
            ));
            Ok(())
        }
        "weeks" => {
            let numbering = value.ok_or_else(|| {
                CommandError::InvalidArguments("usage: config weeks <iso|sunday>".into())
            })?;
            context.config.week_numbering = numbering.parse::<WeekNumbering>()?;
            context.persist_config()?;
            io::print_success(format!(
                "Week numbering set to {}.",
                context.config.week_numbering.as_str()
            ));
            Ok(())
        }
        "currency" => {
            let code = value
                .map(str::trim)
                .filter(|code| code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
                .ok_or_else(|| {
                    CommandError::InvalidArguments("usage: config currency <ISO code>".into())
                })?;
            context.config.currency = code.to_ascii_uppercase();
            context.persist_config()?;
            io::print_success(format!(
                "Currency set to {} ({}).",
                context.config.currency,
                symbol_for(&context.config.currency)
            ));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config key `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    section("Configuration");
    io::print_info(format!(
        "  Months back : {} (choices: {})",
        config.months_back,
        months_choices()
    ));
    io::print_info(format!("  Weeks       : {}", config.week_numbering.as_str()));
    io::print_info(format!(
        "  Currency    : {} ({})",
        config.currency,
        symbol_for(&config.currency)
    ));
    io::print_info(format!("  Locale      : {}", config.locale.language_tag));
    io::print_info(format!("  Records key : {}", config.records_key));
    io::print_info(format!("  Data dir    : {}", context.base_dir().display()));
}

fn months_choices() -> String {
    MONTHS_BACK_CHOICES
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => {
            let backups = context.store().list_backups()?;
            if backups.is_empty() {
                io::print_info("No backups yet. One is taken before every save.");
                return Ok(());
            }
            section(format!("Backups of `{}`", context.store().key()));
            for name in backups {
                io::print_info(format!("  {}", name));
            }
            Ok(())
        }
        ["restore", name] => {
            if !context.confirm(&format!("Replace current records with `{}`?", name))? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            let report = context.store().restore_backup(name)?;
            context.install_snapshot(report);
            io::print_success(format!(
                "Restored {} record(s) from {}.",
                context.book.len(),
                name
            ));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: backup [list|restore <name>]".into(),
        )),
    }
}
