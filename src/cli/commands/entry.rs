use crate::cli::core::{
    dispatch_subcommand, parse_amount, require_args, CommandError, CommandResult,
    SubcommandHandler,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::domain::{EntryDraft, EntryLine};

const ADD_USAGE: &str =
    "entry add <date> <narration> -d <account>=<amount>... -c <account>=<amount>... [--post]";

const SUBCOMMANDS: [(&str, SubcommandHandler); 4] = [
    ("add", add),
    ("list", list),
    ("show", show),
    ("reverse", reverse),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "entry",
        "Record and inspect journal entries",
        "entry add <date> <narration> -d <account>=<amount>... -c <account>=<amount>... [--post]
         entry list [date]
         entry show <id>
         entry reverse <id> <date>",
        cmd_entry,
    )
    .with_subcommands(&SUBCOMMANDS)]
}

fn cmd_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    dispatch_subcommand(context, "entry", args, &SUBCOMMANDS)
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, ADD_USAGE)?;
    let (draft, post) = parse_draft(args)?;
    if post {
        let summary = context.manager.record_and_post(draft)?;
        output::success(format!(
            "Journal entry {} recorded and posted ({} lines).",
            summary.entry_id, summary.lines
        ));
    } else {
        let id = context.manager.record_entry(draft)?;
        output::success(format!("Journal entry {id} recorded."));
        output::hint(format!("Run `ledger post {id}` to update balances."));
    }
    Ok(())
}

/// `<date> <narration>` followed by `-d`/`--debit`, `-c`/`--credit` lines and an
/// optional `--post` flag.
fn parse_draft(args: &[&str]) -> Result<(EntryDraft, bool), CommandError> {
    let mut draft = EntryDraft::new(args[0], args[1]);
    let mut post = false;
    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match *flag {
            "--post" => post = true,
            "-d" | "--debit" | "-c" | "--credit" => {
                let pair = rest.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`{flag}` needs <account>=<amount>"))
                })?;
                let line = parse_line(pair)?;
                if matches!(*flag, "-d" | "--debit") {
                    draft.debits.push(line);
                } else {
                    draft.credits.push(line);
                }
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unexpected argument `{other}`; usage: {ADD_USAGE}"
                )))
            }
        }
    }
    Ok((draft, post))
}

fn parse_line(pair: &str) -> Result<EntryLine, CommandError> {
    let (account, amount) = pair.rsplit_once('=').ok_or_else(|| {
        CommandError::InvalidArguments(format!("expected <account>=<amount>, got `{pair}`"))
    })?;
    Ok(EntryLine::new(account.trim(), parse_amount(amount)?))
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let entries = context.manager.entries(args.first().copied());
    if entries.is_empty() {
        output::info("No journal entries found.");
        return Ok(());
    }
    let money = context.manager.currency_format().clone();
    output::section("Journal");
    for entry in entries {
        let status = if context.manager.is_posted(&entry.id) {
            "posted"
        } else {
            "unposted"
        };
        output::plain(format!(
            "{}  {}  {:<36} {:>16}  {}",
            entry.id,
            entry.date_label(),
            entry.narration,
            money.format(entry.total_debits()),
            status
        ));
    }
    Ok(())
}

fn show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "entry show <id>")?;
    let money = context.manager.currency_format().clone();
    let entry = context.manager.entry(args[0])?;
    output::section(format!("{} ({})", entry.id, entry.date_label()));
    output::plain(format!("Narration: {}", entry.narration));
    for (side, line) in entry.lines() {
        output::plain(format!(
            "  {:<6} {:<30} {:>16}",
            side.label(),
            line.account,
            money.format(line.amount)
        ));
    }
    output::plain(format!(
        "  Totals: {} / {}",
        money.format(entry.total_debits()),
        money.format(entry.total_credits())
    ));
    Ok(())
}

fn reverse(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "entry reverse <id> <date>")?;
    let summary = context.manager.reverse_entry(args[0], args[1])?;
    output::success(format!(
        "Reversal {} of {} recorded and posted.",
        summary.entry_id, args[0]
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_flags_parse() {
        let args = [
            "2024-01-01",
            "Owner investment",
            "-d",
            "Cash=1,000",
            "--credit",
            "Owner's Equity=1000",
            "--post",
        ];
        let (draft, post) = parse_draft(&args).unwrap();
        assert!(post);
        assert_eq!(draft.debits, vec![EntryLine::new("Cash", 1000.0)]);
        assert_eq!(draft.credits[0].account, "Owner's Equity");
    }

    #[test]
    fn account_names_may_contain_equals() {
        let line = parse_line("A=B=12.5").unwrap();
        assert_eq!(line.account, "A=B");
        assert_eq!(line.amount, 12.5);
    }

    #[test]
    fn dangling_flag_is_rejected() {
        assert!(parse_draft(&["2024-01-01", "x", "-d"]).is_err());
    }
}
