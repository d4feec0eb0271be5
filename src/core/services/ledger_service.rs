//! Posting engine: the only path by which journal entries move account balances.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::account::ChartOfAccounts;
use crate::domain::common::{amounts_match, NamedEntity};
use crate::domain::journal::{Journal, JournalEntry};
use crate::domain::ledger::{LedgerBook, LedgerRecord};

use super::account_service::missing;
use super::{AccountService, ServiceError, ServiceResult};

/// Outcome of a successful posting.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingSummary {
    pub entry_id: String,
    pub lines: usize,
}

/// An entry that could not be re-posted during a rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildFailure {
    pub entry_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildReport {
    pub posted: usize,
    pub failed: Vec<RebuildFailure>,
}

impl RebuildReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!(
                "Ledger rebuilt successfully. Processed {} entries.",
                self.posted
            )
        } else {
            format!(
                "Ledger rebuild completed with errors. Success: {}, Errors: {}",
                self.posted,
                self.failed.len()
            )
        }
    }
}

pub struct LedgerService;

impl LedgerService {
    /// Applies every line of `entry` (debits first, then credits).
    ///
    /// New balances are worked out in an overlay keyed by account; the chart and the
    /// ledger book are only updated once every line has resolved, so a failed posting
    /// changes nothing.
    pub fn post(
        chart: &mut ChartOfAccounts,
        book: &mut LedgerBook,
        entry_id: &str,
        entry: &JournalEntry,
    ) -> ServiceResult<PostingSummary> {
        let mut staged: HashMap<String, f64> = HashMap::new();
        let mut records = Vec::with_capacity(entry.debits.len() + entry.credits.len());

        for (side, line) in entry.lines() {
            let account = chart
                .resolve(&line.account)
                .ok_or_else(|| missing(&line.account))?;
            let name = account.name().to_string();
            AccountService::check_amount(line.amount).map_err(|err| {
                ServiceError::invalid(format!(
                    "Failed to update balance for account '{name}': {err}"
                ))
            })?;
            let current = staged.get(&name).copied().unwrap_or(account.balance());
            let running_balance = account.kind().apply(current, line.amount, side);
            staged.insert(name.clone(), running_balance);
            records.push((
                name,
                LedgerRecord {
                    date: entry.date,
                    je_id: entry_id.to_string(),
                    entry_type: side,
                    amount: line.amount,
                    running_balance,
                },
            ));
        }

        for (name, balance) in &staged {
            AccountService::set_balance(chart, name, *balance)?;
        }
        let lines = records.len();
        for (name, record) in records {
            book.append(&name, record);
        }
        info!(entry = entry_id, lines, "journal entry posted");
        Ok(PostingSummary {
            entry_id: entry_id.to_string(),
            lines,
        })
    }

    /// Posting history for an account, resolved case-insensitively.
    pub fn account_ledger<'a>(
        chart: &ChartOfAccounts,
        book: &'a LedgerBook,
        name: &str,
    ) -> ServiceResult<&'a [LedgerRecord]> {
        let canonical = AccountService::resolve_name(chart, name)?;
        Ok(book.history(&canonical))
    }

    /// Zeroes every balance, clears the ledger, and re-posts the whole journal in order.
    ///
    /// Individual failures are collected and do not stop the rebuild.
    pub fn rebuild(
        chart: &mut ChartOfAccounts,
        book: &mut LedgerBook,
        journal: &Journal,
    ) -> RebuildReport {
        chart.reset_balances();
        book.clear();

        let mut report = RebuildReport::default();
        for entry in journal.entries() {
            match Self::post(chart, book, &entry.id, entry) {
                Ok(_) => report.posted += 1,
                Err(err) => {
                    warn!(entry = %entry.id, error = %err, "entry skipped during rebuild");
                    report.failed.push(RebuildFailure {
                        entry_id: entry.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        info!(
            posted = report.posted,
            failed = report.failed.len(),
            "ledger rebuilt"
        );
        report
    }

    /// Replays each account's history from zero and reports every disagreement with
    /// the stored running balances or the current account balance.
    pub fn verify(chart: &ChartOfAccounts, book: &LedgerBook) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, records) in book.accounts() {
            let Some(account) = chart.resolve(name) else {
                warnings.push(format!("ledger references unknown account '{name}'"));
                continue;
            };
            let mut balance = 0.0;
            for record in records {
                balance = account
                    .kind()
                    .apply(balance, record.amount, record.entry_type);
                if !amounts_match(balance, record.running_balance) {
                    warnings.push(format!(
                        "'{name}' record for {} shows {:.2}, replay gives {:.2}",
                        record.je_id, record.running_balance, balance
                    ));
                }
            }
            if !amounts_match(balance, account.balance()) {
                warnings.push(format!(
                    "'{name}' balance {:.2} differs from ledger replay {:.2}",
                    account.balance(),
                    balance
                ));
            }
        }

        for account in chart.iter() {
            if book.history(account.name()).is_empty() && !amounts_match(account.balance(), 0.0) {
                warnings.push(format!(
                    "'{}' carries {:.2} with no ledger history",
                    account.name(),
                    account.balance()
                ));
            }
        }

        for warning in &warnings {
            warn!(%warning, "ledger integrity");
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::JournalService;
    use crate::domain::account::EntrySide;
    use crate::domain::journal::{EntryDraft, EntryLine};

    fn setup() -> (ChartOfAccounts, Journal) {
        let mut chart = ChartOfAccounts::new();
        AccountService::create(&mut chart, "Cash", "Asset", 0.0).unwrap();
        AccountService::create(&mut chart, "Owner's Equity", "Owner's Equity", 0.0).unwrap();
        AccountService::create(&mut chart, "Sales", "Revenue", 0.0).unwrap();
        let mut journal = Journal::new();
        JournalService::create(
            &mut journal,
            &chart,
            EntryDraft::new("2024-01-01", "Owner investment")
                .debit("Cash", 1000.0)
                .credit("Owner's Equity", 1000.0),
        )
        .unwrap();
        JournalService::create(
            &mut journal,
            &chart,
            EntryDraft::new("2024-01-03", "Cash sale")
                .debit("cash", 250.0)
                .credit("Sales", 250.0),
        )
        .unwrap();
        (chart, journal)
    }

    fn post_all(chart: &mut ChartOfAccounts, book: &mut LedgerBook, journal: &Journal) {
        for entry in journal.entries() {
            LedgerService::post(chart, book, &entry.id, entry).unwrap();
        }
    }

    #[test]
    fn posting_moves_balances_and_records_history() {
        let (mut chart, journal) = setup();
        let mut book = LedgerBook::new();
        post_all(&mut chart, &mut book, &journal);

        assert_eq!(AccountService::balance(&chart, "Cash").unwrap(), 1250.0);
        assert_eq!(AccountService::balance(&chart, "Owner's Equity").unwrap(), 1000.0);
        let cash = LedgerService::account_ledger(&chart, &book, "CASH").unwrap();
        assert_eq!(cash.len(), 2);
        assert_eq!(cash[1].running_balance, 1250.0);
        assert_eq!(cash[1].entry_type, EntrySide::Debit);
    }

    #[test]
    fn failed_posting_applies_nothing() {
        let (mut chart, _) = setup();
        let mut book = LedgerBook::new();
        let broken = JournalEntry {
            id: "JE-20240101-009".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            narration: "Dangling".into(),
            debits: vec![EntryLine::new("Cash", 10.0)],
            credits: vec![EntryLine::new("Deleted Account", 10.0)],
        };
        let err = LedgerService::post(&mut chart, &mut book, &broken.id, &broken).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(AccountService::balance(&chart, "Cash").unwrap(), 0.0);
        assert!(book.is_empty());
    }

    #[test]
    fn account_ledger_requires_existing_account() {
        let (chart, _) = setup();
        let book = LedgerBook::new();
        assert!(LedgerService::account_ledger(&chart, &book, "Cash")
            .unwrap()
            .is_empty());
        assert!(matches!(
            LedgerService::account_ledger(&chart, &book, "Ghost"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let (mut chart, journal) = setup();
        let mut book = LedgerBook::new();
        post_all(&mut chart, &mut book, &journal);
        // Post the first entry a second time to corrupt the derived state.
        let first = &journal.entries()[0];
        LedgerService::post(&mut chart, &mut book, &first.id, first).unwrap();

        let report = LedgerService::rebuild(&mut chart, &mut book, &journal);
        assert!(report.is_clean());
        assert_eq!(report.posted, 2);
        let (chart_once, book_once) = (chart.clone(), book.clone());

        LedgerService::rebuild(&mut chart, &mut book, &journal);
        assert_eq!(chart, chart_once);
        assert_eq!(book, book_once);
        assert_eq!(AccountService::balance(&chart, "Cash").unwrap(), 1250.0);
    }

    #[test]
    fn rebuild_skips_failing_entries_and_keeps_going() {
        let (mut chart, mut journal) = setup();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let orphan = JournalEntry {
            id: "JE-20240102-001".into(),
            date,
            narration: "Closed account".into(),
            debits: vec![EntryLine::new("Cash", 40.0)],
            credits: vec![EntryLine::new("Retired Fund", 40.0)],
        };
        // Reorder so the orphan sits between the two valid entries.
        let valid = journal.entries().to_vec();
        journal = Journal::new();
        journal.push(valid[0].clone());
        journal.push(orphan);
        journal.push(valid[1].clone());

        let mut book = LedgerBook::new();
        let report = LedgerService::rebuild(&mut chart, &mut book, &journal);

        assert_eq!(report.posted, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].entry_id, "JE-20240102-001");
        assert!(report.failed[0].reason.contains("Retired Fund"));
        assert!(!report.is_clean());
        assert_eq!(
            report.summary(),
            "Ledger rebuild completed with errors. Success: 2, Errors: 1"
        );
        assert_eq!(AccountService::balance(&chart, "Cash").unwrap(), 1250.0);
        assert_eq!(AccountService::balance(&chart, "Sales").unwrap(), 250.0);
        assert!(!book.is_posted("JE-20240102-001"));
        assert!(LedgerService::verify(&chart, &book).is_empty());
    }

    #[test]
    fn repeated_account_in_one_entry_accumulates_running_balance() {
        let (mut chart, _) = setup();
        let mut book = LedgerBook::new();
        let split = JournalEntry {
            id: "JE-20240105-001".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            narration: "Two receipts".into(),
            debits: vec![EntryLine::new("Cash", 10.0), EntryLine::new("cash", 20.0)],
            credits: vec![EntryLine::new("Sales", 30.0)],
        };
        let summary = LedgerService::post(&mut chart, &mut book, &split.id, &split).unwrap();

        assert_eq!(summary.lines, 3);
        let running: Vec<f64> = book.history("Cash").iter().map(|r| r.running_balance).collect();
        assert_eq!(running, vec![10.0, 30.0]);
        assert_eq!(AccountService::balance(&chart, "Cash").unwrap(), 30.0);
        assert_eq!(AccountService::balance(&chart, "Sales").unwrap(), 30.0);
    }

    #[test]
    fn invalid_amount_on_a_later_line_applies_nothing() {
        let (mut chart, _) = setup();
        let mut book = LedgerBook::new();
        let broken = JournalEntry {
            id: "JE-20240106-001".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            narration: "Corrupt amount".into(),
            debits: vec![EntryLine::new("Cash", 10.0)],
            credits: vec![EntryLine::new("Sales", -10.0)],
        };
        let err = LedgerService::post(&mut chart, &mut book, &broken.id, &broken).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m.contains("'Sales'")));
        assert_eq!(AccountService::balance(&chart, "Cash").unwrap(), 0.0);
        assert!(book.is_empty());
    }

    #[test]
    fn verify_flags_drift() {
        let (mut chart, journal) = setup();
        let mut book = LedgerBook::new();
        post_all(&mut chart, &mut book, &journal);
        assert!(LedgerService::verify(&chart, &book).is_empty());

        AccountService::apply_entry(&mut chart, "Cash", 5.0, EntrySide::Debit).unwrap();
        let warnings = LedgerService::verify(&chart, &book);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cash"));
    }
}
