use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::config::Config;
use crate::core::repository::{BookRepository, Books, Dirty};
use crate::core::services::{
    AccountService, CashFlowClassifier, JournalService, KeywordClassifier, LedgerService,
    PostingSummary, RebuildReport, ReportService, ServiceError, ServiceResult,
};
use crate::currency::CurrencyFormat;
use crate::domain::{Account, AccountType, EntryDraft, JournalEntry, LedgerRecord};
use crate::reports::{
    render, BalanceSheet, CashFlowStatement, IncomeStatement, RatioAnalysis, ReportKind,
    ReportOutcome, TrialBalance,
};
use crate::storage::ReportSink;

type Classifier = Box<dyn CashFlowClassifier + Send + Sync>;

/// Facade that owns the loaded books, writes every change back through the repository,
/// and archives rendered reports.
///
/// Each mutating call works on a copy of the books; the copy only replaces the live
/// state once the repository commit succeeded.
pub struct BookManager {
    books: Books,
    repository: BookRepository,
    sink: Box<dyn ReportSink>,
    classifier: Classifier,
    cash_hint: String,
    money: CurrencyFormat,
}

impl BookManager {
    pub fn open(repository: BookRepository, sink: Box<dyn ReportSink>) -> ServiceResult<Self> {
        let books = repository.load()?;
        info!(
            accounts = books.chart.len(),
            entries = books.journal.len(),
            "books loaded"
        );
        let config = Config::default();
        Ok(Self {
            books,
            repository,
            sink,
            classifier: Box::new(KeywordClassifier::default()),
            cash_hint: config.cash_account_hint.clone(),
            money: config.currency_format(),
        })
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.cash_hint = config.cash_account_hint.clone();
        self.money = config.currency_format();
        self
    }

    pub fn with_classifier(
        mut self,
        classifier: impl CashFlowClassifier + Send + Sync + 'static,
    ) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn books(&self) -> &Books {
        &self.books
    }

    pub fn currency_format(&self) -> &CurrencyFormat {
        &self.money
    }

    /// Re-reads every document, dropping in-memory state.
    pub fn reload(&mut self) -> ServiceResult<()> {
        self.books = self.repository.load()?;
        Ok(())
    }

    pub fn create_account(
        &mut self,
        name: &str,
        kind: &str,
        initial_balance: f64,
    ) -> ServiceResult<Account> {
        self.mutate(Dirty::ACCOUNTS, |books| {
            AccountService::create(&mut books.chart, name, kind, initial_balance)
        })
    }

    pub fn accounts(&self, kind: Option<AccountType>) -> Vec<&Account> {
        AccountService::list(&self.books.chart, kind)
    }

    pub fn balance(&self, name: &str) -> ServiceResult<f64> {
        AccountService::balance(&self.books.chart, name)
    }

    /// Validates and stores a journal entry without posting it.
    pub fn record_entry(&mut self, draft: EntryDraft) -> ServiceResult<String> {
        self.mutate(Dirty::JOURNAL, |books| {
            JournalService::create(&mut books.journal, &books.chart, draft)
        })
    }

    pub fn entries(&self, date_filter: Option<&str>) -> Vec<&JournalEntry> {
        JournalService::list(&self.books.journal, date_filter)
    }

    pub fn entry(&self, id: &str) -> ServiceResult<&JournalEntry> {
        JournalService::get(&self.books.journal, id)
    }

    pub fn is_posted(&self, id: &str) -> bool {
        self.books.ledger.is_posted(id)
    }

    /// Posts a recorded entry; an entry can only be posted once.
    pub fn post_entry(&mut self, id: &str) -> ServiceResult<PostingSummary> {
        self.mutate(Dirty::POSTING, |books| post_recorded(books, id))
    }

    /// Records and posts in one commit: either both land or neither does.
    pub fn record_and_post(&mut self, draft: EntryDraft) -> ServiceResult<PostingSummary> {
        self.mutate(Dirty::ALL, |books| {
            let id = JournalService::create(&mut books.journal, &books.chart, draft)?;
            post_recorded(books, &id)
        })
    }

    /// Records and posts the reversal of `id`, dated `date`.
    pub fn reverse_entry(&mut self, id: &str, date: &str) -> ServiceResult<PostingSummary> {
        self.mutate(Dirty::ALL, |books| {
            let reversal =
                JournalService::reversing_entry(&mut books.journal, &books.chart, id, date)?;
            post_recorded(books, &reversal)
        })
    }

    pub fn account_ledger(&self, name: &str) -> ServiceResult<&[LedgerRecord]> {
        LedgerService::account_ledger(&self.books.chart, &self.books.ledger, name)
    }

    pub fn rebuild(&mut self) -> ServiceResult<RebuildReport> {
        self.mutate(Dirty::POSTING, |books| {
            Ok(LedgerService::rebuild(
                &mut books.chart,
                &mut books.ledger,
                &books.journal,
            ))
        })
    }

    pub fn verify(&self) -> Vec<String> {
        LedgerService::verify(&self.books.chart, &self.books.ledger)
    }

    pub fn list_backups(&self, document: &str) -> ServiceResult<Vec<String>> {
        self.repository.store().list_backups(document)
    }

    /// Restores one document from a backup and reloads the books from storage.
    ///
    /// Restoring a single document can leave the others out of step; `verify` and
    /// `rebuild` are the way back to a consistent ledger.
    pub fn restore_backup(&mut self, document: &str, backup: &str) -> ServiceResult<()> {
        self.repository.store().restore(document, backup)?;
        self.reload()?;
        info!(document, backup, "document restored from backup");
        Ok(())
    }

    pub fn trial_balance(&self) -> ReportOutcome<TrialBalance> {
        let data = ReportService::trial_balance(&self.books.chart);
        let text = render::render_trial_balance(&data, now(), &self.money);
        self.publish(ReportKind::TrialBalance, data, text)
    }

    pub fn income_statement(&self) -> ReportOutcome<IncomeStatement> {
        let data = ReportService::income_statement(&self.books.chart);
        let text = render::render_income_statement(&data, now(), &self.money);
        self.publish(ReportKind::IncomeStatement, data, text)
    }

    pub fn balance_sheet(&self) -> ReportOutcome<BalanceSheet> {
        let data = ReportService::balance_sheet(&self.books.chart);
        let text = render::render_balance_sheet(&data, now(), &self.money);
        self.publish(ReportKind::BalanceSheet, data, text)
    }

    pub fn cash_flow(&self) -> ServiceResult<ReportOutcome<CashFlowStatement>> {
        let data = ReportService::cash_flow(
            &self.books.chart,
            &self.books.ledger,
            &self.books.journal,
            &self.cash_hint,
            self.classifier.as_ref(),
        )?;
        let text = render::render_cash_flow(&data, now(), &self.money);
        Ok(self.publish(ReportKind::CashFlow, data, text))
    }

    pub fn ratio_analysis(&self) -> ReportOutcome<RatioAnalysis> {
        let data = ReportService::ratio_analysis(&self.books.chart);
        let text = render::render_ratio_analysis(&data, now(), &self.money);
        self.publish(ReportKind::RatioAnalysis, data, text)
    }

    fn publish<T>(&self, kind: ReportKind, data: T, text: String) -> ReportOutcome<T> {
        match self.sink.publish(kind.sink_name(), &text) {
            Ok(location) => ReportOutcome {
                data,
                text,
                archived: true,
                message: format!("{kind} saved to {location}"),
            },
            Err(err) => {
                warn!(report = kind.sink_name(), error = %err, "report not archived");
                ReportOutcome {
                    data,
                    text,
                    archived: false,
                    message: format!("{kind} generated but not saved: {err}"),
                }
            }
        }
    }

    fn mutate<T>(
        &mut self,
        dirty: Dirty,
        op: impl FnOnce(&mut Books) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut staged = self.books.clone();
        let value = op(&mut staged)?;
        if let Err(err) = self.repository.commit(&staged, dirty) {
            warn!(error = %err, "commit failed; changes discarded");
            return Err(err);
        }
        self.books = staged;
        Ok(value)
    }
}

fn post_recorded(books: &mut Books, id: &str) -> ServiceResult<PostingSummary> {
    if books.ledger.is_posted(id) {
        return Err(ServiceError::conflict(format!(
            "Journal entry '{id}' is already posted"
        )));
    }
    let entry = JournalService::get(&books.journal, id)?.clone();
    LedgerService::post(&mut books.chart, &mut books.ledger, id, &entry)
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
