use crate::cli::core::{dispatch_subcommand, CommandResult, SubcommandHandler};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::reports::ReportOutcome;

const SUBCOMMANDS: [(&str, SubcommandHandler); 5] = [
    ("trial", trial),
    ("income", income),
    ("balance", balance),
    ("cashflow", cashflow),
    ("ratios", ratios),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "report",
        "Generate and archive financial statements",
        "report trial|income|balance|cashflow|ratios",
        cmd_report,
    )
    .with_subcommands(&SUBCOMMANDS)]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    dispatch_subcommand(context, "report", args, &SUBCOMMANDS)
}

fn show<T>(outcome: ReportOutcome<T>) {
    output::plain(&outcome.text);
    if outcome.archived {
        output::success(outcome.message);
    } else {
        output::warning(outcome.message);
    }
}

fn trial(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context.manager.trial_balance());
    Ok(())
}

fn income(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context.manager.income_statement());
    Ok(())
}

fn balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context.manager.balance_sheet());
    Ok(())
}

fn cashflow(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context.manager.cash_flow()?);
    Ok(())
}

fn ratios(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context.manager.ratio_analysis());
    Ok(())
}
