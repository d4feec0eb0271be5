use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::errors::BookError;

use super::{DocumentStore, ReportSink, Result};

/// In-process document store, mostly for tests and throwaway sessions.
///
/// `fail_writes` makes every write error out so callers can exercise their
/// persistence-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    pub fn document(&self, name: &str) -> Option<String> {
        self.documents().ok()?.get(name).cloned()
    }

    fn documents(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.documents
            .lock()
            .map_err(|_| BookError::persistence("memory store lock poisoned"))
    }

    fn check_writable(&self) -> Result<()> {
        let failing = self.fail_writes.lock().map(|flag| *flag).unwrap_or(true);
        if failing {
            Err(BookError::persistence("memory store is read-only"))
        } else {
            Ok(())
        }
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Option<String>> {
        Ok(self.documents()?.get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        self.check_writable()?;
        self.documents()?
            .insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn save_batch(&self, documents: &[(&str, String)]) -> Result<()> {
        self.check_writable()?;
        let mut store = self.documents()?;
        for (name, contents) in documents {
            store.insert(name.to_string(), contents.clone());
        }
        Ok(())
    }
}

/// Keeps published reports in memory, keyed by report name.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    reports: Mutex<HashMap<String, String>>,
    fail: bool,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every publish fails.
    pub fn failing() -> Self {
        Self {
            reports: Mutex::default(),
            fail: true,
        }
    }

    pub fn report(&self, name: &str) -> Option<String> {
        self.reports.lock().ok()?.get(name).cloned()
    }
}

impl ReportSink for MemoryReportSink {
    fn publish(&self, name: &str, text: &str) -> Result<String> {
        if self.fail {
            return Err(BookError::persistence(format!(
                "cannot publish report '{name}'"
            )));
        }
        self.reports
            .lock()
            .map_err(|_| BookError::persistence("report sink lock poisoned"))?
            .insert(name.to_string(), text.to_string());
        Ok(format!("memory:{name}"))
    }
}
