//! Shared runtime state for CLI interactions and command execution.

use crate::{
    config::ConfigManager,
    core::{BookManager, BookRepository},
    storage::{FileReportSink, JsonStorage},
};

use super::{
    commands,
    core::{CliError, CommandError, LoopControl},
    output,
    registry::{CommandEntry, CommandRegistry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: BookManager,
    pub running: bool,
}

impl ShellContext {
    /// Opens the books under the resolved data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(
            Some(config_manager.base_dir().to_path_buf()),
            Some(config.backup_retention),
        )?;
        let sink = FileReportSink::new(config_manager.reports_dir(&config));
        let manager = BookManager::open(BookRepository::new(Box::new(storage)), Box::new(sink))?
            .with_config(&config);
        Ok(Self::with_manager(mode, manager))
    }

    pub fn with_manager(mode: CliMode, manager: BookManager) -> Self {
        if mode == CliMode::Script {
            colored::control::set_override(false);
        }
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            manager,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        format!("smartledger [{} accounts]> ", self.manager.books().chart.len())
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
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

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    /// Runs one already-tokenized line the same way the shell loop does.
    pub(crate) fn process_tokens(&mut self, tokens: &[String]) -> Result<LoopControl, CommandError> {
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }
}
