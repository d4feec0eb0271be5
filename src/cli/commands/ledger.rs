use crate::cli::core::{dispatch_subcommand, require_args, CommandResult, SubcommandHandler};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::storage::{ACCOUNTS_DOC, JOURNAL_DOC, LEDGER_DOC};

const SUBCOMMANDS: [(&str, SubcommandHandler); 4] = [
    ("show", show),
    ("post", post),
    ("rebuild", rebuild),
    ("verify", verify),
];

const BACKUP_SUBCOMMANDS: [(&str, SubcommandHandler); 2] =
    [("list", list_backups), ("restore", restore_backup)];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "ledger",
            "Post entries and inspect ledger history",
            "ledger show <account>
             ledger post <entry_id>
             ledger rebuild
             ledger verify",
            cmd_ledger,
        )
        .with_subcommands(&SUBCOMMANDS),
        CommandEntry::new(
            "backups",
            "List or restore stored document backups",
            "backups list [accounts|journal_entries|ledger_data]
             backups restore <document> <backup>",
            cmd_backups,
        )
        .with_subcommands(&BACKUP_SUBCOMMANDS),
    ]
}

fn cmd_ledger(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    dispatch_subcommand(context, "ledger", args, &SUBCOMMANDS)
}

fn show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "ledger show <account>")?;
    let name = args.join(" ");
    let money = context.manager.currency_format().clone();
    let records = context.manager.account_ledger(&name)?;
    if records.is_empty() {
        output::info(format!("No ledger records for '{name}'."));
        return Ok(());
    }
    output::section(format!("Ledger: {name}"));
    output::plain(format!(
        "{:<12} {:<16} {:<6} {:>16} {:>18}",
        "Date", "Entry", "Side", "Amount", "Balance"
    ));
    output::plain("-".repeat(72));
    for record in records {
        output::plain(format!(
            "{:<12} {:<16} {:<6} {:>16} {:>18}",
            record.date.to_string(),
            record.je_id,
            record.entry_type.label(),
            money.format(record.amount),
            money.format(record.running_balance)
        ));
    }
    Ok(())
}

fn post(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "ledger post <entry_id>")?;
    let summary = context.manager.post_entry(args[0])?;
    output::success(format!(
        "Journal entry {} posted ({} lines).",
        summary.entry_id, summary.lines
    ));
    Ok(())
}

fn rebuild(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = context.manager.rebuild()?;
    if report.is_clean() {
        output::success(report.summary());
    } else {
        output::warning(report.summary());
        for failure in &report.failed {
            output::warning(format!("  {}: {}", failure.entry_id, failure.reason));
        }
    }
    Ok(())
}

fn verify(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = context.manager.verify();
    if warnings.is_empty() {
        output::success("Ledger is consistent with account balances.");
    } else {
        for warning in &warnings {
            output::warning(warning);
        }
        output::hint("Run `ledger rebuild` to recompute balances from the journal.");
    }
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    dispatch_subcommand(context, "backups", args, &BACKUP_SUBCOMMANDS)
}

fn list_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let documents: Vec<&str> = match args.first() {
        Some(document) => vec![*document],
        None => vec![ACCOUNTS_DOC, JOURNAL_DOC, LEDGER_DOC],
    };
    for document in documents {
        let backups = context.manager.list_backups(document)?;
        output::section(format!("Backups: {document}"));
        if backups.is_empty() {
            output::info("none");
        }
        for backup in backups {
            output::plain(format!("  {backup}"));
        }
    }
    Ok(())
}

fn restore_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "backups restore <document> <backup>")?;
    context.manager.restore_backup(args[0], args[1])?;
    output::success(format!("Restored '{}' from {}.", args[0], args[1]));
    output::hint("Run `ledger verify` to check the books against the restored document.");
    Ok(())
}
