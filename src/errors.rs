use std::result::Result as StdResult;

use thiserror::Error;

/// Failure taxonomy shared by the registry, journal, ledger, and report layers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unbalanced entry: Debits ({debits:.2}) != Credits ({credits:.2})")]
    Unbalanced { debits: f64, credits: f64 },
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl BookError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }
}

pub type Result<T> = StdResult<T, BookError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BookError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Line editor failure: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::io::Error> for BookError {
    fn from(err: std::io::Error) -> Self {
        BookError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for BookError {
    fn from(err: serde_json::Error) -> Self {
        BookError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_message_reports_both_totals() {
        let err = BookError::Unbalanced {
            debits: 500.0,
            credits: 400.0,
        };
        let message = err.to_string();
        assert!(message.contains("500.00"), "unexpected message: {message}");
        assert!(message.contains("400.00"), "unexpected message: {message}");
    }

    #[test]
    fn io_errors_become_persistence_failures() {
        let err: BookError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, BookError::Persistence(ref m) if m.contains("disk full")));
    }
}
