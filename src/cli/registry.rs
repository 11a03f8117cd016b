//! Name-to-handler table behind the shell's dispatch, help and completion.

use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Misspellings further than this from every command get no suggestion.
pub const MAX_SUGGESTION_DISTANCE: usize = 3;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    /// Alternative forms are separated by ` | `.
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }

    pub fn usage_lines(&self) -> impl Iterator<Item = &'static str> {
        self.usage.split(" | ").map(str::trim)
    }
}

/// Commands in registration order. Lookups ignore ASCII case.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`, replacing an earlier command of the same name in place.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.index.get(entry.name) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(entry.name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        let slot = match self.index.get(name) {
            Some(slot) => *slot,
            None => *self.index.get(name.to_ascii_lowercase().as_str())?,
        };
        self.entries.get(slot)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.entries.iter().collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Closest command name to `input`, if any is within [`MAX_SUGGESTION_DISTANCE`].
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let input = input.to_ascii_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &input), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }
}
