use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn script_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("smartledger_cli").unwrap();
    cmd.env("SMARTLEDGER_CLI_SCRIPT", "1")
        .env("SMARTLEDGER_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = r#"account add Cash Asset
account add "Owner's Equity" "Owner's Equity"
entry add 2024-01-01 "Owner investment" -d Cash=1000 -c "Owner's Equity=1000" --post
account balance Cash
report trial
exit
"#;

    script_cmd(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Account 'Cash' created"))
        .stdout(contains("JE-20240101-001 recorded and posted"))
        .stdout(contains("Cash balance: $1,000.00"))
        .stdout(contains("[OK] Trial Balance is balanced"));

    let report = std::fs::read_to_string(home.path().join("reports/trial_balance.txt")).unwrap();
    assert!(report.contains("TRIAL BALANCE"));
    let journal = std::fs::read_to_string(home.path().join("data/journal_entries.json")).unwrap();
    assert!(journal.contains("Owner investment"));
}

#[test]
fn errors_are_reported_and_script_continues() {
    let home = TempDir::new().unwrap();
    let input = "account add Cash Asset\n\
                 account add Sales Revenue\n\
                 entry add 2024-01-01 Mismatch -d Cash=500 -c Sales=400\n\
                 acount list\n\
                 ledger rebiuld\n\
                 account list\n";

    script_cmd(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("500.00").and(contains("400.00")))
        .stdout(contains("Suggestion: `account`?"))
        .stdout(contains("Did you mean `ledger rebuild`?"))
        .stdout(contains("Chart of Accounts"));
}

#[test]
fn state_persists_between_runs() {
    let home = TempDir::new().unwrap();
    script_cmd(&home)
        .write_stdin("account add Cash Asset 250\n")
        .assert()
        .success();

    script_cmd(&home)
        .write_stdin("account balance cash\nledger verify\n")
        .assert()
        .success()
        .stdout(contains("$250.00"));
}

#[test]
fn backups_can_be_listed_and_restored() {
    let home = TempDir::new().unwrap();
    script_cmd(&home)
        .write_stdin("account add Cash Asset\naccount add Bank Asset\n")
        .assert()
        .success();

    let backups_dir = home.path().join("backups/accounts");
    let backup = std::fs::read_dir(&backups_dir)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .file_name()
        .into_string()
        .unwrap();

    script_cmd(&home)
        .write_stdin(format!(
            "backups list accounts\nbackups restore accounts {backup}\naccount list\nbackups restore accounts missing.json\n"
        ))
        .assert()
        .success()
        .stdout(contains(backup.as_str()))
        .stdout(contains("Restored 'accounts'"))
        .stdout(contains("Bank").not())
        .stdout(contains("Not found"));
}

#[test]
fn version_prints_package_version() {
    let home = TempDir::new().unwrap();
    script_cmd(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}
