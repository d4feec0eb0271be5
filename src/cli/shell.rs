use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{report_error, CliError, LoopControl};
use crate::cli::output;
use crate::cli::registry::CommandRegistry;
use crate::cli::shell_context::{CliMode, ShellContext};

pub const SCRIPT_ENV: &str = "SMARTLEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match context.mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(&context.registry);
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output::info("SmartLedger shell. Type `help` for commands.");

    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if handle_line(context, trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::hint("Type `exit` or press Ctrl-D to leave the shell.");
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if handle_line(context, trimmed) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// Tokenizes and runs one line; command failures are reported, never propagated.
pub(crate) fn handle_line(context: &mut ShellContext, line: &str) -> LoopControl {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(&err);
            return LoopControl::Continue;
        }
    };
    match context.process_tokens(&tokens) {
        Ok(control) => control,
        Err(err) => {
            report_error(err);
            LoopControl::Continue
        }
    }
}

/// Completes command names in the first word and subcommand words in the second.
struct CommandHelper {
    commands: Vec<(String, Vec<&'static str>)>,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<(String, Vec<&'static str>)> = registry
            .entries()
            .iter()
            .map(|entry| (entry.name.to_ascii_lowercase(), entry.subcommands.clone()))
            .collect();
        commands.sort_by(|a, b| a.0.cmp(&b.0));
        Self { commands }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<Pair> {
        let pool: Vec<&str> = match words {
            [] => self.commands.iter().map(|(name, _)| name.as_str()).collect(),
            [command] => self
                .commands
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(command))
                .map(|(_, subcommands)| subcommands.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        pool.into_iter()
            .filter(|word| word.starts_with(needle))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();
        Ok((start, self.candidates(&words, &needle)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, CliError> {
    split(input).map_err(|err| CliError::Input(format!("cannot parse `{input}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_names_stay_together() {
        let tokens = parse_command_line(r#"account add "Owner's Equity" "Owner's Equity""#).unwrap();
        assert_eq!(tokens, vec!["account", "add", "Owner's Equity", "Owner's Equity"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(matches!(
            parse_command_line("account add \"Cash"),
            Err(CliError::Input(_))
        ));
    }

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        crate::cli::commands::register_all(&mut registry);
        CommandHelper::new(&registry)
    }

    fn words(pairs: Vec<Pair>) -> Vec<String> {
        pairs.into_iter().map(|pair| pair.replacement).collect()
    }

    #[test]
    fn completes_commands_then_subcommands() {
        let helper = helper();
        assert_eq!(words(helper.candidates(&[], "ac")), vec!["account"]);
        assert_eq!(words(helper.candidates(&["ledger"], "re")), vec!["rebuild"]);
        assert_eq!(words(helper.candidates(&["backups"], "")), vec!["list", "restore"]);
        assert!(helper.candidates(&["entry", "add"], "").is_empty());
    }
}
