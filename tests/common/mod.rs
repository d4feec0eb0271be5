#![allow(dead_code)]

use std::path::{Path, PathBuf};

use smartledger_core::{
    core::{BookManager, BookRepository},
    domain::EntryDraft,
    storage::{FileReportSink, JsonStorage},
};
use tempfile::TempDir;

/// Opens books stored under `base`, with reports archived to `<base>/reports`.
pub fn open_books(base: &Path) -> BookManager {
    let storage =
        JsonStorage::new(Some(base.to_path_buf()), Some(3)).expect("create json storage backend");
    let sink = FileReportSink::new(reports_dir(base));
    BookManager::open(BookRepository::new(Box::new(storage)), Box::new(sink))
        .expect("open books")
}

pub fn reports_dir(base: &Path) -> PathBuf {
    base.join("reports")
}

/// Isolated books in a fresh temporary directory; keep the guard alive.
pub fn setup_test_env() -> (BookManager, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let manager = open_books(temp.path());
    (manager, temp)
}

/// Cash, equipment, a loan, owner's equity, sales and rent.
pub fn seed_accounts(manager: &mut BookManager) {
    for (name, kind) in [
        ("Cash", "Asset"),
        ("Equipment", "Asset"),
        ("Bank Loan", "Liability"),
        ("Owner's Equity", "Owner's Equity"),
        ("Sales", "Revenue"),
        ("Rent", "Expense"),
    ] {
        manager
            .create_account(name, kind, 0.0)
            .expect("create account");
    }
}

pub fn owner_investment(date: &str, amount: f64) -> EntryDraft {
    EntryDraft::new(date, "Owner investment")
        .debit("Cash", amount)
        .credit("Owner's Equity", amount)
}
