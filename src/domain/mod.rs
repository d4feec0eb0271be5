pub mod account;
pub mod common;
pub mod journal;
pub mod ledger;

pub use account::{Account, AccountType, ChartOfAccounts, EntrySide};
pub use common::{amounts_match, Displayable, NamedEntity, BALANCE_TOLERANCE};
pub use journal::{EntryDraft, EntryLine, Journal, JournalEntry};
pub use ledger::{LedgerBook, LedgerRecord};
