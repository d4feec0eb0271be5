//! Validation and bookkeeping for journal entries.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::account::ChartOfAccounts;
use crate::domain::common::amounts_match;
use crate::domain::journal::{EntryDraft, EntryLine, Journal, JournalEntry, DATE_FORMAT};

use super::{ServiceError, ServiceResult};

/// Records balanced entries into the journal; entries are never edited afterwards.
pub struct JournalService;

impl JournalService {
    /// Parses an ISO `YYYY-MM-DD` date.
    pub fn parse_date(raw: &str) -> ServiceResult<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map_err(|_| ServiceError::invalid("Invalid date format. Use YYYY-MM-DD"))
    }

    /// Next free identifier for the given date.
    pub fn next_entry_id(journal: &Journal, date: &str) -> ServiceResult<String> {
        let date = Self::parse_date(date)?;
        Ok(journal.next_entry_id(date))
    }

    /// Validates `draft` and appends it to the journal, returning the new entry id.
    ///
    /// Checks run in order and stop at the first failure: date, narration, presence of
    /// both sides, amounts, account references, balance. Nothing is written on failure.
    pub fn create(
        journal: &mut Journal,
        chart: &ChartOfAccounts,
        draft: EntryDraft,
    ) -> ServiceResult<String> {
        let date = Self::parse_date(&draft.date)?;

        let narration = draft.narration.trim();
        if narration.is_empty() {
            return Err(ServiceError::invalid("Narration cannot be empty"));
        }

        if draft.debits.is_empty() || draft.credits.is_empty() {
            return Err(ServiceError::invalid(
                "Both debit and credit lines are required",
            ));
        }

        check_amounts("debit", &draft.debits)?;
        check_amounts("credit", &draft.credits)?;
        check_accounts(chart, "Debit", &draft.debits)?;
        check_accounts(chart, "Credit", &draft.credits)?;

        let debits: f64 = draft.debits.iter().map(|line| line.amount).sum();
        let credits: f64 = draft.credits.iter().map(|line| line.amount).sum();
        if !amounts_match(debits, credits) {
            return Err(ServiceError::Unbalanced { debits, credits });
        }

        let id = journal.next_entry_id(date);
        journal.push(JournalEntry {
            id: id.clone(),
            date,
            narration: narration.to_string(),
            debits: draft.debits,
            credits: draft.credits,
        });
        info!(entry = %id, total = debits, "journal entry recorded");
        Ok(id)
    }

    /// All entries in submission order, or only those dated exactly `date_filter`.
    pub fn list<'a>(journal: &'a Journal, date_filter: Option<&str>) -> Vec<&'a JournalEntry> {
        match date_filter {
            Some(filter) => journal
                .entries()
                .iter()
                .filter(|entry| entry.date_label() == filter)
                .collect(),
            None => journal.entries().iter().collect(),
        }
    }

    pub fn get<'a>(journal: &'a Journal, id: &str) -> ServiceResult<&'a JournalEntry> {
        journal
            .entry(id)
            .ok_or_else(|| ServiceError::not_found(format!("Journal entry '{id}' does not exist")))
    }

    /// Records a new entry that undoes `id` by swapping its debit and credit lines.
    pub fn reversing_entry(
        journal: &mut Journal,
        chart: &ChartOfAccounts,
        id: &str,
        date: &str,
    ) -> ServiceResult<String> {
        let original = Self::get(journal, id)?;
        let draft = EntryDraft {
            date: date.to_string(),
            narration: format!("Reversal of {}: {}", original.id, original.narration),
            debits: original.credits.clone(),
            credits: original.debits.clone(),
        };
        Self::create(journal, chart, draft)
    }
}

fn check_amounts(side: &str, lines: &[EntryLine]) -> ServiceResult<()> {
    match lines
        .iter()
        .find(|line| !(line.amount.is_finite() && line.amount > 0.0))
    {
        Some(line) => Err(ServiceError::invalid(format!(
            "Invalid {side} amount: {}",
            line.amount
        ))),
        None => Ok(()),
    }
}

fn check_accounts(chart: &ChartOfAccounts, side: &str, lines: &[EntryLine]) -> ServiceResult<()> {
    match lines.iter().find(|line| !chart.contains(&line.account)) {
        Some(line) => Err(ServiceError::not_found(format!(
            "{side} account '{}' does not exist",
            line.account
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::AccountService;

    fn chart() -> ChartOfAccounts {
        let mut chart = ChartOfAccounts::new();
        AccountService::create(&mut chart, "Cash", "Asset", 0.0).unwrap();
        AccountService::create(&mut chart, "Owner's Equity", "Owner's Equity", 0.0).unwrap();
        chart
    }

    fn investment(date: &str) -> EntryDraft {
        EntryDraft::new(date, "Owner investment")
            .debit("Cash", 1000.0)
            .credit("Owner's Equity", 1000.0)
    }

    #[test]
    fn create_assigns_sequential_ids_per_date() {
        let chart = chart();
        let mut journal = Journal::new();
        let first = JournalService::create(&mut journal, &chart, investment("2024-01-01")).unwrap();
        let second = JournalService::create(&mut journal, &chart, investment("2024-01-01")).unwrap();
        assert_eq!(first, "JE-20240101-001");
        assert_eq!(second, "JE-20240101-002");
    }

    #[test]
    fn bad_date_is_reported_before_anything_else() {
        let chart = chart();
        let mut journal = Journal::new();
        let draft = EntryDraft::new("01/02/2024", "  ");
        let err = JournalService::create(&mut journal, &chart, draft).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m.contains("YYYY-MM-DD")));
    }

    #[test]
    fn blank_narration_is_rejected() {
        let chart = chart();
        let mut journal = Journal::new();
        let draft = EntryDraft::new("2024-01-01", " ")
            .debit("Cash", 1.0)
            .credit("Owner's Equity", 1.0);
        let err = JournalService::create(&mut journal, &chart, draft).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref m) if m.contains("Narration")));
    }

    #[test]
    fn missing_side_is_rejected() {
        let chart = chart();
        let mut journal = Journal::new();
        let draft = EntryDraft::new("2024-01-01", "Half").debit("Cash", 1.0);
        let err = JournalService::create(&mut journal, &chart, draft).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn non_positive_amount_names_the_value() {
        let chart = chart();
        let mut journal = Journal::new();
        let draft = EntryDraft::new("2024-01-01", "Refund")
            .debit("Cash", 10.0)
            .credit("Owner's Equity", -10.0);
        let err = JournalService::create(&mut journal, &chart, draft).unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidInput("Invalid credit amount: -10".into())
        );
    }

    #[test]
    fn unknown_account_names_side_and_account() {
        let chart = chart();
        let mut journal = Journal::new();
        let draft = EntryDraft::new("2024-01-01", "Rent")
            .debit("Rent Expense", 10.0)
            .credit("Cash", 10.0);
        let err = JournalService::create(&mut journal, &chart, draft).unwrap_err();
        match err {
            ServiceError::NotFound(message) => {
                assert!(message.contains("Debit"));
                assert!(message.contains("Rent Expense"));
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn unbalanced_entry_leaves_journal_unchanged() {
        let chart = chart();
        let mut journal = Journal::new();
        let draft = EntryDraft::new("2024-01-01", "Mismatch")
            .debit("Cash", 500.0)
            .credit("Owner's Equity", 400.0);
        let err = JournalService::create(&mut journal, &chart, draft).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Unbalanced {
                debits: 500.0,
                credits: 400.0
            }
        );
        assert!(journal.is_empty());
    }

    #[test]
    fn accounts_resolve_ignoring_case() {
        let chart = chart();
        let mut journal = Journal::new();
        let draft = EntryDraft::new("2024-01-01", "Lowercase")
            .debit("cash", 5.0)
            .credit("OWNER'S EQUITY", 5.0);
        assert!(JournalService::create(&mut journal, &chart, draft).is_ok());
    }

    #[test]
    fn list_filters_by_exact_date() {
        let chart = chart();
        let mut journal = Journal::new();
        JournalService::create(&mut journal, &chart, investment("2024-01-01")).unwrap();
        JournalService::create(&mut journal, &chart, investment("2024-01-02")).unwrap();
        assert_eq!(JournalService::list(&journal, Some("2024-01-02")).len(), 1);
        assert_eq!(JournalService::list(&journal, None).len(), 2);
        assert!(JournalService::list(&journal, Some("2024-1-2")).is_empty());
    }

    #[test]
    fn reverse_swaps_sides_and_keeps_original() {
        let chart = chart();
        let mut journal = Journal::new();
        let id = JournalService::create(&mut journal, &chart, investment("2024-01-01")).unwrap();
        let reversal_id =
            JournalService::reversing_entry(&mut journal, &chart, &id, "2024-01-05").unwrap();
        let reversal = JournalService::get(&journal, &reversal_id).unwrap();
        assert_eq!(reversal.debits[0].account, "Owner's Equity");
        assert_eq!(reversal.credits[0].account, "Cash");
        assert!(reversal.narration.starts_with("Reversal of JE-20240101-001"));
        assert_eq!(journal.len(), 2);
    }
}
