#![doc(test(attr(deny(warnings))))]

//! SmartLedger keeps double-entry books: a chart of accounts, an immutable journal of
//! balanced entries, a posting engine that moves balances and records running-balance
//! history, and the financial statements derived from them.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod reports;
pub mod storage;
pub mod utils;

pub use crate::core::{BookManager, BookRepository};
pub use crate::errors::{BookError, CliError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SmartLedger tracing initialized.");
    });
}
