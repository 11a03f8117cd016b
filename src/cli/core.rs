//! Shell context, dispatch and the argument helpers shared by every command.

use std::{
    collections::HashMap,
    env, io,
    path::{Path, PathBuf},
};

use dialoguer::theme::ColorfulTheme;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::{Config, ConfigError, ConfigManager},
    currency::format_amount,
    errors::{LedgerError, StoreError},
    export::ExportError,
    ledger::{CalendarDate, RecordBook},
    storage::{JsonRecordStore, LoadReport, RecordStore},
    time::{Clock, FixedClock, SystemClock},
    utils::paths::{app_data_dir, records_dir_in},
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

/// Pins "today" for every command, mainly for scripted runs.
pub const TODAY_ENV: &str = "GROCER_CORE_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub book: RecordBook,
    pub config: Config,
    store: JsonRecordStore,
    config_manager: ConfigManager,
    clock: Box<dyn Clock>,
    base_dir: PathBuf,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let clock = clock_from_env()?;
        Self::with_base_dir(mode, app_data_dir(), clock)
    }

    /// Builds a context whose records and configuration live below `base`.
    pub fn with_base_dir(
        mode: CliMode,
        base: impl Into<PathBuf>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let base_dir = base.into();
        let config_manager = ConfigManager::with_base_dir(&base_dir)?;
        let config = config_manager.load()?;
        let store = JsonRecordStore::new(records_dir_in(&base_dir), &config.records_key)?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut context = ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            book: RecordBook::new(),
            config,
            store,
            config_manager,
            clock,
            base_dir,
            running: true,
        };
        let report = context.store.load()?;
        context.install_snapshot(report);
        Ok(context)
    }

    /// Replaces the in-memory book with a loaded snapshot and reports dropped entries.
    pub(crate) fn install_snapshot(&mut self, report: LoadReport) {
        for skipped in &report.skipped {
            cli_io::print_warning(format!(
                "Skipped stored record #{} ({}): {}",
                skipped.index,
                skipped.id.as_deref().unwrap_or("no id"),
                skipped.reason
            ));
        }
        debug!(
            records = report.records.len(),
            skipped = report.skipped.len(),
            "record book loaded"
        );
        self.book = RecordBook::from_records(report.records);
    }

    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub(crate) fn store(&self) -> &JsonRecordStore {
        &self.store
    }

    pub(crate) fn persist_records(&self) -> CommandResult {
        self.store.save(self.book.records())?;
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        format_amount(amount, &self.config)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("grocer ({} records)> ", self.book.len())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            debug!(command, args = args.len(), "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    /// Asks before destructive changes; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_info("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
    }
}

fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) => {
            let today =
                CalendarDate::parse(&raw).map_err(|err| CliError::Input(err.to_string()))?;
            Ok(Box::new(FixedClock(today)))
        }
        Err(_) => Ok(Box::new(SystemClock)),
    }
}

/// Positional arguments plus `--name value` options and bare `--switch` flags.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    positionals: Vec<&'a str>,
    options: HashMap<&'a str, &'a str>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    pub(crate) fn parse(
        args: &[&'a str],
        options: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(token) = iter.next() {
            let Some(name) = token.strip_prefix("--") else {
                parsed.positionals.push(token);
                continue;
            };
            if options.contains(&name) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("option `--{}` needs a value", name))
                })?;
                parsed.options.insert(name, value);
            } else if switches.contains(&name) {
                parsed.switches.push(name);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{}`",
                    name
                )));
            }
        }
        Ok(parsed)
    }

    pub(crate) fn positional(&self, index: usize) -> Option<&'a str> {
        self.positionals.get(index).copied()
    }

    pub(crate) fn positionals(&self) -> &[&'a str] {
        &self.positionals
    }

    pub(crate) fn value(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub(crate) fn flag(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }

    pub(crate) fn date(&self, name: &str) -> Result<Option<CalendarDate>, CommandError> {
        self.value(name).map(parse_date).transpose()
    }
}

pub(crate) fn parse_date(input: &str) -> Result<CalendarDate, CommandError> {
    Ok(CalendarDate::parse(input)?)
}

/// Accepts both `12.50` and `12,50`.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

pub(crate) fn parse_months(input: &str) -> Result<u32, CommandError> {
    input.trim().parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid number of months `{}`", input))
    })
}

#[cfg(test)]
pub(crate) fn script_context(base: &Path, today: &str) -> ShellContext {
    let today = CalendarDate::parse(today).expect("valid date");
    ShellContext::with_base_dir(CliMode::Script, base, Box::new(FixedClock(today)))
        .expect("script context")
}

#[cfg(test)]
pub(crate) fn run_lines(context: &mut ShellContext, lines: &[&str]) {
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => panic!("`{line}` failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_line_handles_quotes() {
        let tokens = crate::cli::shell::parse_command_line(
            "add expense 10 2025-01-02 --description \"Shop rent\"",
        )
        .expect("tokens");
        assert_eq!(
            tokens,
            vec!["add", "expense", "10", "2025-01-02", "--description", "Shop rent"]
        );
    }

    #[test]
    fn parsed_args_split_options_and_switches() {
        let args = ["income", "10", "--category", "Sales", "--paid", "2025-01-01"];
        let parsed = ParsedArgs::parse(&args, &["category"], &["paid"]).expect("parse");
        assert_eq!(parsed.positionals(), &["income", "10", "2025-01-01"]);
        assert_eq!(parsed.value("category"), Some("Sales"));
        assert!(parsed.flag("paid"));

        let err = ParsedArgs::parse(&["--category"], &["category"], &[]).expect_err("no value");
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        let err = ParsedArgs::parse(&["--bogus"], &[], &[]).expect_err("unknown");
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn amounts_accept_decimal_comma() {
        assert_eq!(parse_amount("12,50").expect("comma"), 12.5);
        assert!(parse_amount("twelve").is_err());
    }

    #[test]
    fn unknown_command_does_not_fail() {
        let dir = tempdir().expect("temp dir");
        let mut context = script_context(dir.path(), "2025-03-04");
        assert_eq!(
            context.process_line("lsit").expect("suggestion only"),
            LoopControl::Continue
        );
        assert_eq!(context.process_line("exit").expect("exit"), LoopControl::Exit);
    }

    #[test]
    fn records_survive_a_new_context() {
        let dir = tempdir().expect("temp dir");
        let mut context = script_context(dir.path(), "2025-03-04");
        run_lines(
            &mut context,
            &["add income 100 2025-01-07 --category Sales", "add expense 30 2025-01-08"],
        );
        assert_eq!(context.book.len(), 2);

        let reopened = script_context(dir.path(), "2025-03-04");
        assert_eq!(reopened.book.records(), context.book.records());
    }
}
