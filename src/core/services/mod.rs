pub mod account_service;
pub mod journal_service;
pub mod ledger_service;
pub mod report_service;

pub use account_service::AccountService;
pub use journal_service::JournalService;
pub use ledger_service::{LedgerService, PostingSummary, RebuildFailure, RebuildReport};
pub use report_service::{CashFlowClassifier, KeywordClassifier, ReportService};

pub use crate::errors::BookError as ServiceError;

pub type ServiceResult<T> = Result<T, ServiceError>;
