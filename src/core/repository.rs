//! Typed access to the three persisted aggregates.

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::domain::{ChartOfAccounts, Journal, LedgerBook};
use crate::errors::{BookError, Result};
use crate::storage::{DocumentStore, ACCOUNTS_DOC, JOURNAL_DOC, LEDGER_DOC};

/// The full in-memory state of one set of books.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Books {
    pub chart: ChartOfAccounts,
    pub journal: Journal,
    pub ledger: LedgerBook,
}

/// Which aggregates an operation touched and therefore must be written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty {
    pub accounts: bool,
    pub journal: bool,
    pub ledger: bool,
}

impl Dirty {
    pub const ACCOUNTS: Dirty = Dirty {
        accounts: true,
        journal: false,
        ledger: false,
    };
    pub const JOURNAL: Dirty = Dirty {
        accounts: false,
        journal: true,
        ledger: false,
    };
    pub const POSTING: Dirty = Dirty {
        accounts: true,
        journal: false,
        ledger: true,
    };
    pub const ALL: Dirty = Dirty {
        accounts: true,
        journal: true,
        ledger: true,
    };
}

/// Per-aggregate load/save over any [`DocumentStore`].
pub struct BookRepository {
    store: Box<dyn DocumentStore>,
}

impl BookRepository {
    pub fn new(store: Box<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn load_accounts(&self) -> Result<ChartOfAccounts> {
        self.load_document(ACCOUNTS_DOC)
    }

    pub fn save_accounts(&self, chart: &ChartOfAccounts) -> Result<()> {
        self.store.write(ACCOUNTS_DOC, &encode(ACCOUNTS_DOC, chart)?)
    }

    pub fn load_journal(&self) -> Result<Journal> {
        self.load_document(JOURNAL_DOC)
    }

    pub fn save_journal(&self, journal: &Journal) -> Result<()> {
        self.store.write(JOURNAL_DOC, &encode(JOURNAL_DOC, journal)?)
    }

    pub fn load_ledger(&self) -> Result<LedgerBook> {
        self.load_document(LEDGER_DOC)
    }

    pub fn save_ledger(&self, ledger: &LedgerBook) -> Result<()> {
        self.store.write(LEDGER_DOC, &encode(LEDGER_DOC, ledger)?)
    }

    pub fn load(&self) -> Result<Books> {
        Ok(Books {
            chart: self.load_accounts()?,
            journal: self.load_journal()?,
            ledger: self.load_ledger()?,
        })
    }

    /// Writes the dirty aggregates of `books` in a single batch.
    pub fn commit(&self, books: &Books, dirty: Dirty) -> Result<()> {
        let mut documents = Vec::with_capacity(3);
        if dirty.accounts {
            documents.push((ACCOUNTS_DOC, encode(ACCOUNTS_DOC, &books.chart)?));
        }
        if dirty.journal {
            documents.push((JOURNAL_DOC, encode(JOURNAL_DOC, &books.journal)?));
        }
        if dirty.ledger {
            documents.push((LEDGER_DOC, encode(LEDGER_DOC, &books.ledger)?));
        }
        if documents.is_empty() {
            return Ok(());
        }
        self.store.save_batch(&documents)?;
        debug!(documents = documents.len(), "books committed");
        Ok(())
    }

    fn load_document<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.store.read(name)? {
            None => Ok(T::default()),
            Some(raw) if raw.trim().is_empty() => Ok(T::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|err| {
                BookError::persistence(format!("document '{name}' is malformed: {err}"))
            }),
        }
    }
}

fn encode<T: Serialize>(name: &str, value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| BookError::persistence(format!("cannot encode '{name}': {err}")))
}
