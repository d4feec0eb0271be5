use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for entry in registry.entries() {
        output::info(format!("  {:<10} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  Description: {}", entry.description));
    for line in entry.usage.lines() {
        output::info(format!("  Usage: {}", line.trim()));
    }
    if !entry.subcommands.is_empty() {
        output::hint(format!("subcommands: {}", entry.subcommands.join(", ")));
    }
}
