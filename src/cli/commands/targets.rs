use crate::analysis::{TargetReport, TargetService, TargetSettings, WeekNumbering};
use crate::cli::core::{parse_months, CommandError, CommandResult, ParsedArgs, ShellContext};
use crate::cli::io;
use crate::cli::output::section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "targets",
        "Show daily, weekly and monthly revenue targets",
        "targets [--months N] [--date YYYY-MM-DD] [--weeks iso|sunday]",
        cmd_targets,
    )]
}

fn cmd_targets(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["months", "date", "weeks"], &[])?;
    if let Some(extra) = parsed.positionals().first() {
        return Err(CommandError::InvalidArguments(format!(
            "unexpected argument `{}`",
            extra
        )));
    }

    let months_back = match parsed.value("months") {
        Some(raw) => parse_months(raw)?,
        None => context.config.months_back,
    };
    if months_back == 0 {
        return Err(CommandError::InvalidArguments(
            "the lookback window needs at least one month".into(),
        ));
    }
    let week_numbering = match parsed.value("weeks") {
        Some(raw) => raw.parse::<WeekNumbering>()?,
        None => context.config.week_numbering,
    };
    let settings = TargetSettings {
        months_back,
        week_numbering,
        target_date: parsed.date("date")?,
    };

    let snapshot = TargetService::snapshot(context.book.records(), &settings, context.clock());

    section(format!("Revenue targets ({} month(s) back)", months_back));
    print_target(
        context,
        &format!("Daily ({}, {})", snapshot.target_date, snapshot.target_date.weekday()),
        &snapshot.daily,
        "day(s)",
    );
    print_target(
        context,
        &format!(
            "Weekly (week {}, {} numbering)",
            week_numbering.week_of(snapshot.today),
            week_numbering.as_str()
        ),
        &snapshot.weekly,
        "week(s)",
    );
    print_target(
        context,
        &format!("Monthly ({})", snapshot.today.month_key()),
        &snapshot.monthly,
        "month(s)",
    );
    io::print_info(format!("Window: {}", snapshot.monthly.window));
    Ok(())
}

fn print_target(context: &ShellContext, label: &str, report: &TargetReport<'_>, unit: &str) {
    io::print_info(format!(
        "{:<40} {:>16}   from {} over {} {}",
        label,
        context.money(report.target),
        context.money(report.total),
        report.buckets,
        unit
    ));
}

#[cfg(test)]
mod tests {
    use crate::analysis::{TargetService, TargetSettings};
    use crate::cli::core::{run_lines, script_context};
    use tempfile::tempdir;

    #[test]
    fn targets_command_accepts_overrides() {
        let dir = tempdir().expect("temp dir");
        let mut context = script_context(dir.path(), "2025-03-04");
        run_lines(
            &mut context,
            &[
                "add income 100 2025-01-07",
                "add income 200 2025-02-04",
                "targets",
                "targets --months 2 --weeks sunday --date 2025-03-11",
            ],
        );
        let snapshot = TargetService::snapshot(
            context.book.records(),
            &TargetSettings {
                months_back: 2,
                ..TargetSettings::default()
            },
            context.clock(),
        );
        assert_eq!(snapshot.daily.target, 150.0);
    }

    #[test]
    fn targets_command_rejects_bad_options() {
        let dir = tempdir().expect("temp dir");
        let mut context = script_context(dir.path(), "2025-03-04");
        assert!(context.process_line("targets --months 0").is_err());
        assert!(context.process_line("targets --weeks lunar").is_err());
        assert!(context.process_line("targets today").is_err());
    }
}
