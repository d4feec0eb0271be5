use crate::cli::core::{closest, CommandResult, SubcommandHandler};
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A top-level shell command and the subcommand words it understands.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub subcommands: Vec<&'static str>,
}

impl CommandEntry {
    pub fn new(
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
            subcommands: Vec::new(),
        }
    }

    /// Records the subcommand words of a dispatch table for help and completion.
    pub(crate) fn with_subcommands(mut self, table: &[(&'static str, SubcommandHandler)]) -> Self {
        self.subcommands = table.iter().map(|(name, _)| *name).collect();
        self
    }
}

/// Commands in registration order; names are matched ignoring case.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`, replacing any command already registered under the same name.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.position(entry.name) {
            Some(slot) => self.entries[slot] = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.position(name).map(|slot| &self.entries[slot])
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Nearest registered command name for a mistyped one.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let names: Vec<&'static str> = self.names().collect();
        closest(&input.to_lowercase(), &names)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name.eq_ignore_ascii_case(name))
    }
}
