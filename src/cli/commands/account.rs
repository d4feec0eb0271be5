use crate::cli::core::{
    dispatch_subcommand, parse_amount, require_args, CommandError, CommandResult,
    SubcommandHandler,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::domain::{AccountType, NamedEntity};

const SUBCOMMANDS: [(&str, SubcommandHandler); 3] = [
    ("add", add),
    ("list", list),
    ("balance", balance),
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "account",
        "Create and inspect accounts",
        "account add <name> <type> [initial_balance]
         account list [type]
         account balance <name>",
        cmd_account,
    )
    .with_subcommands(&SUBCOMMANDS)]
}

fn cmd_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    dispatch_subcommand(context, "account", args, &SUBCOMMANDS)
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "account add <name> <type> [initial_balance]")?;
    let initial = match args.get(2) {
        Some(raw) => parse_amount(raw)?,
        None => 0.0,
    };
    let account = context.manager.create_account(args[0], args[1], initial)?;
    output::success(format!(
        "Account '{}' created as {}.",
        account.name(),
        account.kind()
    ));
    Ok(())
}

fn list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = match args.first() {
        Some(_) => Some(
            args.join(" ")
                .parse::<AccountType>()
                .map_err(CommandError::InvalidArguments)?,
        ),
        None => None,
    };
    let accounts = context.manager.accounts(kind);
    if accounts.is_empty() {
        output::info("No accounts found.");
        return Ok(());
    }
    let money = context.manager.currency_format().clone();
    output::section("Chart of Accounts");
    output::plain(format!("{:<30} {:<16} {:>18}", "Account", "Type", "Balance"));
    output::plain("-".repeat(66));
    for account in accounts {
        output::plain(format!(
            "{:<30} {:<16} {:>18}",
            account.name(),
            account.kind().label(),
            money.format(account.balance())
        ));
    }
    Ok(())
}

fn balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "account balance <name>")?;
    let name = args.join(" ");
    let balance = context.manager.balance(&name)?;
    output::info(format!(
        "{} balance: {}",
        name,
        context.manager.currency_format().format(balance)
    ));
    Ok(())
}
