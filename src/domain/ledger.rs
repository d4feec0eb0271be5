use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::account::EntrySide;

/// One posted line, recording the account balance right after it was applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRecord {
    pub date: NaiveDate,
    pub je_id: String,
    pub entry_type: EntrySide,
    pub amount: f64,
    pub running_balance: f64,
}

/// Per-account posting history keyed by canonical account name.
///
/// Records reference accounts and journal entries by name/id only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LedgerBook {
    records: BTreeMap<String, Vec<LedgerRecord>>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for `account` in posting order; empty when nothing was posted.
    pub fn history(&self, account: &str) -> &[LedgerRecord] {
        self.records
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&str, &[LedgerRecord])> {
        self.records
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Whether any record originates from journal entry `je_id`.
    pub fn is_posted(&self, je_id: &str) -> bool {
        self.records
            .values()
            .flatten()
            .any(|record| record.je_id == je_id)
    }

    pub(crate) fn append(&mut self, account: &str, record: LedgerRecord) {
        self.records
            .entry(account.to_string())
            .or_default()
            .push(record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
