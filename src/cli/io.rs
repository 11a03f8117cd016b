use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;
use crate::cli::output;

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

/// Prints a pre-rendered table or chart line by line.
pub fn print_block(block: &str) {
    for line in block.lines() {
        output::info(line);
    }
}

/// Yes/no question for destructive changes such as deleting or bulk-paying records.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    let answer = Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact_opt()?;
    Ok(answer.unwrap_or(false))
}
