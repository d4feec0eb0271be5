pub mod json_backend;
pub mod memory;
pub mod report_sink;

use crate::errors::BookError;

pub type Result<T> = std::result::Result<T, BookError>;

/// Document names used by the book repository.
pub const ACCOUNTS_DOC: &str = "accounts";
pub const JOURNAL_DOC: &str = "journal_entries";
pub const LEDGER_DOC: &str = "ledger_data";

/// Keyed JSON documents. Reading a document that was never written yields `None`.
pub trait DocumentStore: Send + Sync {
    fn read(&self, name: &str) -> Result<Option<String>>;
    fn write(&self, name: &str, contents: &str) -> Result<()>;

    /// Writes several documents so that either all of them land or none do.
    ///
    /// The default writes one by one; backends that can stage should override it.
    fn save_batch(&self, documents: &[(&str, String)]) -> Result<()> {
        for (name, contents) in documents {
            self.write(name, contents)?;
        }
        Ok(())
    }

    /// Backups for `name`, newest first. Backends without backups return nothing.
    fn list_backups(&self, _name: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Puts backup `backup` back as the live `name` document and returns its contents.
    fn restore(&self, name: &str, backup: &str) -> Result<String> {
        Err(BookError::not_found(format!(
            "backup `{backup}` of '{name}' does not exist"
        )))
    }
}

/// Destination for rendered report text.
pub trait ReportSink: Send + Sync {
    /// Stores `text` under `name` and returns a human-readable location.
    fn publish(&self, name: &str, text: &str) -> Result<String>;
}

pub use json_backend::JsonStorage;
pub use memory::{MemoryReportSink, MemoryStore};
pub use report_sink::FileReportSink;
