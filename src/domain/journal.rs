use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::account::EntrySide;
use crate::domain::common::Displayable;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const ID_DATE_FORMAT: &str = "%Y%m%d";

/// One debit or credit line of a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryLine {
    pub account: String,
    pub amount: f64,
}

impl EntryLine {
    pub fn new(account: impl Into<String>, amount: f64) -> Self {
        Self {
            account: account.into(),
            amount,
        }
    }
}

/// Unvalidated input for a new journal entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub date: String,
    pub narration: String,
    pub debits: Vec<EntryLine>,
    pub credits: Vec<EntryLine>,
}

impl EntryDraft {
    pub fn new(date: impl Into<String>, narration: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            narration: narration.into(),
            debits: Vec::new(),
            credits: Vec::new(),
        }
    }

    pub fn debit(mut self, account: impl Into<String>, amount: f64) -> Self {
        self.debits.push(EntryLine::new(account, amount));
        self
    }

    pub fn credit(mut self, account: impl Into<String>, amount: f64) -> Self {
        self.credits.push(EntryLine::new(account, amount));
        self
    }
}

/// An immutable, balanced journal entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    pub narration: String,
    pub debits: Vec<EntryLine>,
    pub credits: Vec<EntryLine>,
}

impl JournalEntry {
    pub fn total_debits(&self) -> f64 {
        self.debits.iter().map(|line| line.amount).sum()
    }

    pub fn total_credits(&self) -> f64 {
        self.credits.iter().map(|line| line.amount).sum()
    }

    /// Debit lines first, then credit lines, each tagged with its side.
    pub fn lines(&self) -> impl Iterator<Item = (EntrySide, &EntryLine)> {
        self.debits
            .iter()
            .map(|line| (EntrySide::Debit, line))
            .chain(self.credits.iter().map(|line| (EntrySide::Credit, line)))
    }

    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

impl Displayable for JournalEntry {
    fn display_label(&self) -> String {
        format!("{} {} {}", self.id, self.date_label(), self.narration)
    }
}

/// The journal document: entries in submission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entry(id).is_some()
    }

    /// Lowest unused `JE-YYYYMMDD-NNN` identifier for `date`, starting at 001.
    pub fn next_entry_id(&self, date: NaiveDate) -> String {
        let used: HashSet<&str> = self.entries.iter().map(|entry| entry.id.as_str()).collect();
        let stamp = date.format(ID_DATE_FORMAT);
        let mut sequence: u32 = 1;
        loop {
            let candidate = format!("JE-{stamp}-{sequence:03}");
            if !used.contains(candidate.as_str()) {
                return candidate;
            }
            sequence += 1;
        }
    }

    pub(crate) fn push(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }
}
