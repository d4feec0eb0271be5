//! Command results, errors, and argument helpers shared by every command.

use std::io;

use strsim::levenshtein;

use crate::cli::output;
pub use crate::errors::CliError;
use crate::errors::BookError;

use super::shell_context::ShellContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] BookError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) => CommandError::InvalidArguments(message),
            CliError::Readline(inner) => CommandError::InvalidArguments(inner.to_string()),
            CliError::Io(inner) => CommandError::Io(inner),
        }
    }
}

/// Subcommand handler: the first argument has already been consumed.
pub(crate) type SubcommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Routes `args[0]` to the matching subcommand, suggesting the closest one on a miss.
pub(crate) fn dispatch_subcommand(
    context: &mut ShellContext,
    command: &str,
    args: &[&str],
    table: &[(&'static str, SubcommandHandler)],
) -> CommandResult {
    let names: Vec<&str> = table.iter().map(|(name, _)| *name).collect();
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments(format!(
            "`{command}` needs a subcommand: {}",
            names.join(", ")
        )));
    };
    let wanted = raw.to_lowercase();
    if let Some((_, handler)) = table.iter().find(|(name, _)| *name == wanted) {
        return handler(context, &args[1..]);
    }
    let message = match closest(&wanted, &names) {
        Some(best) => {
            format!("Unknown subcommand `{command} {raw}`. Did you mean `{command} {best}`?")
        }
        None => format!(
            "Unknown subcommand `{command} {raw}`. Options: {}",
            names.join(", ")
        ),
    };
    Err(CommandError::InvalidArguments(message))
}

/// Closest candidate within an edit distance of 3.
pub(crate) fn closest<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|candidate| (levenshtein(candidate, input), *candidate))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

pub(crate) fn require_args(args: &[&str], count: usize, usage: &str) -> CommandResult {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    } else {
        Ok(())
    }
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{raw}`")))
}

pub(crate) fn report_error(err: CommandError) {
    match err {
        CommandError::ExitRequested => {}
        CommandError::InvalidArguments(message) => {
            output::error(message);
            output::hint("Use `help <command>` for usage details.");
        }
        other => output::error(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_grouping() {
        assert_eq!(parse_amount("1,250.50").unwrap(), 1250.5);
        assert!(parse_amount("ten").is_err());
    }

    #[test]
    fn closest_ignores_distant_candidates() {
        assert_eq!(closest("rebuld", &["show", "post", "rebuild"]), Some("rebuild"));
        assert_eq!(closest("zzzzzzzz", &["show"]), None);
    }
}
