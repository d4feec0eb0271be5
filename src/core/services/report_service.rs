//! Financial statements derived from account balances and ledger history.

use crate::domain::account::{Account, AccountType, ChartOfAccounts};
use crate::domain::common::{amounts_match, normalize_name, NamedEntity};
use crate::domain::journal::Journal;
use crate::domain::ledger::LedgerBook;
use crate::reports::{
    BalanceSheet, CashFlowCategory, CashFlowItem, CashFlowStatement, IncomeStatement,
    RatioAnalysis, StatementLine, TrialBalance, TrialBalanceLine,
};

use super::{ServiceError, ServiceResult};

pub const RETAINED_EARNINGS_LABEL: &str = "Retained Earnings (Net Income)";
pub const DEFAULT_CASH_HINT: &str = "cash";

/// Assigns a cash movement to a cash-flow bucket from its narration.
pub trait CashFlowClassifier {
    fn classify(&self, narration: &str) -> CashFlowCategory;
}

impl<F> CashFlowClassifier for F
where
    F: Fn(&str) -> CashFlowCategory,
{
    fn classify(&self, narration: &str) -> CashFlowCategory {
        self(narration)
    }
}

/// Case-insensitive keyword matching; financing keywords win over investing ones and
/// everything else is operating.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    pub financing: Vec<String>,
    pub investing: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            financing: ["loan", "capital", "equity", "investment"]
                .map(String::from)
                .to_vec(),
            investing: ["equipment", "asset", "property", "building"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl CashFlowClassifier for KeywordClassifier {
    fn classify(&self, narration: &str) -> CashFlowCategory {
        let narration = narration.to_lowercase();
        let mentions = |keywords: &[String]| {
            keywords
                .iter()
                .any(|keyword| narration.contains(&keyword.to_lowercase()))
        };
        if mentions(&self.financing) {
            CashFlowCategory::Financing
        } else if mentions(&self.investing) {
            CashFlowCategory::Investing
        } else {
            CashFlowCategory::Operating
        }
    }
}

/// Pure reads over the books; nothing here mutates state.
pub struct ReportService;

impl ReportService {
    pub fn trial_balance(chart: &ChartOfAccounts) -> TrialBalance {
        let mut lines: Vec<TrialBalanceLine> = chart
            .iter()
            .map(|account| {
                let (debit, credit) = account.kind().split_balance(account.balance());
                TrialBalanceLine {
                    account: account.name().to_string(),
                    kind: account.kind(),
                    debit,
                    credit,
                }
            })
            .collect();
        lines.sort_by(|a, b| a.account.cmp(&b.account));

        let total_debits: f64 = lines.iter().map(|line| line.debit).sum();
        let total_credits: f64 = lines.iter().map(|line| line.credit).sum();
        TrialBalance {
            lines,
            total_debits,
            total_credits,
            is_balanced: amounts_match(total_debits, total_credits),
        }
    }

    pub fn income_statement(chart: &ChartOfAccounts) -> IncomeStatement {
        let revenue = section(chart, AccountType::Revenue);
        let expenses = section(chart, AccountType::Expense);
        let total_revenue = total(&revenue);
        let total_expenses = total(&expenses);
        IncomeStatement {
            revenue,
            expenses,
            total_revenue,
            total_expenses,
            net_income: total_revenue - total_expenses,
        }
    }

    /// Assets, liabilities and equity; current net income is folded into equity as a
    /// retained-earnings line when it is non-zero.
    pub fn balance_sheet(chart: &ChartOfAccounts) -> BalanceSheet {
        let assets = section(chart, AccountType::Asset);
        let liabilities = section(chart, AccountType::Liability);
        let mut equity = section(chart, AccountType::OwnersEquity);

        let net_income = Self::income_statement(chart).net_income;
        if net_income != 0.0 {
            equity.push(StatementLine {
                account: RETAINED_EARNINGS_LABEL.to_string(),
                amount: net_income,
            });
            equity.sort_by(|a, b| a.account.cmp(&b.account));
        }

        let total_assets = total(&assets);
        let total_liabilities = total(&liabilities);
        let total_equity = total(&equity);
        BalanceSheet {
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            is_balanced: amounts_match(total_assets, total_liabilities + total_equity),
        }
    }

    /// First asset account (creation order) whose name contains `cash_hint`.
    pub fn cash_account<'a>(chart: &'a ChartOfAccounts, cash_hint: &str) -> Option<&'a Account> {
        let hint = normalize_name(cash_hint);
        chart.iter().find(|account| {
            account.kind() == AccountType::Asset && account.name().to_lowercase().contains(&hint)
        })
    }

    /// Buckets every movement of the cash account by the narration of its journal entry.
    pub fn cash_flow(
        chart: &ChartOfAccounts,
        book: &LedgerBook,
        journal: &Journal,
        cash_hint: &str,
        classifier: &dyn CashFlowClassifier,
    ) -> ServiceResult<CashFlowStatement> {
        let cash = Self::cash_account(chart, cash_hint)
            .ok_or_else(|| ServiceError::not_found("No Cash account found"))?;
        let history = book.history(cash.name());
        if history.is_empty() {
            return Err(ServiceError::not_found("No cash transactions found"));
        }

        let mut statement = CashFlowStatement {
            cash_account: cash.name().to_string(),
            operating: Vec::new(),
            investing: Vec::new(),
            financing: Vec::new(),
            operating_cash: 0.0,
            investing_cash: 0.0,
            financing_cash: 0.0,
            net_cash_flow: 0.0,
        };

        for record in history {
            let narration = journal
                .entry(&record.je_id)
                .map(|entry| entry.narration.clone())
                .unwrap_or_default();
            let item = CashFlowItem {
                date: record.date,
                je_id: record.je_id.clone(),
                amount: record.amount,
                side: record.entry_type,
                narration,
            };
            let signed = item.signed_amount();
            match classifier.classify(&item.narration) {
                CashFlowCategory::Operating => {
                    statement.operating_cash += signed;
                    statement.operating.push(item);
                }
                CashFlowCategory::Investing => {
                    statement.investing_cash += signed;
                    statement.investing.push(item);
                }
                CashFlowCategory::Financing => {
                    statement.financing_cash += signed;
                    statement.financing.push(item);
                }
            }
        }
        statement.net_cash_flow =
            statement.operating_cash + statement.investing_cash + statement.financing_cash;
        Ok(statement)
    }

    /// Profitability and leverage percentages; `current_ratio` is a fixed 1.0 because
    /// accounts are not split into current and non-current.
    pub fn ratio_analysis(chart: &ChartOfAccounts) -> RatioAnalysis {
        let income = Self::income_statement(chart);
        let sheet = Self::balance_sheet(chart);
        let percent_of = |numerator: f64, denominator: f64| {
            if denominator > 0.0 {
                numerator / denominator * 100.0
            } else {
                0.0
            }
        };
        RatioAnalysis {
            profit_margin: percent_of(income.net_income, income.total_revenue),
            debt_ratio: percent_of(sheet.total_liabilities, sheet.total_assets),
            current_ratio: 1.0,
            roa: percent_of(income.net_income, sheet.total_assets),
            roe: percent_of(income.net_income, sheet.total_equity),
            total_revenue: income.total_revenue,
            net_income: income.net_income,
            total_assets: sheet.total_assets,
            total_liabilities: sheet.total_liabilities,
            total_equity: sheet.total_equity,
        }
    }
}

fn section(chart: &ChartOfAccounts, kind: AccountType) -> Vec<StatementLine> {
    let mut lines: Vec<StatementLine> = chart
        .iter()
        .filter(|account| account.kind() == kind)
        .map(|account| StatementLine {
            account: account.name().to_string(),
            amount: account.balance(),
        })
        .collect();
    lines.sort_by(|a, b| a.account.cmp(&b.account));
    lines
}

fn total(lines: &[StatementLine]) -> f64 {
    lines.iter().map(|line| line.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{AccountService, JournalService, LedgerService};
    use crate::domain::journal::EntryDraft;

    struct Books {
        chart: ChartOfAccounts,
        journal: Journal,
        book: LedgerBook,
    }

    impl Books {
        fn new(accounts: &[(&str, &str)]) -> Self {
            let mut chart = ChartOfAccounts::new();
            for (name, kind) in accounts {
                AccountService::create(&mut chart, name, kind, 0.0).unwrap();
            }
            Self {
                chart,
                journal: Journal::new(),
                book: LedgerBook::new(),
            }
        }

        fn record(&mut self, draft: EntryDraft) {
            let id = JournalService::create(&mut self.journal, &self.chart, draft).unwrap();
            let entry = self.journal.entry(&id).unwrap().clone();
            LedgerService::post(&mut self.chart, &mut self.book, &id, &entry).unwrap();
        }
    }

    fn trading_books() -> Books {
        let mut books = Books::new(&[
            ("Cash", "Asset"),
            ("Equipment", "Asset"),
            ("Bank Loan", "Liability"),
            ("Owner's Equity", "Owner's Equity"),
            ("Sales", "Revenue"),
            ("Rent", "Expense"),
        ]);
        books.record(
            EntryDraft::new("2024-01-01", "Owner capital contribution")
                .debit("Cash", 5000.0)
                .credit("Owner's Equity", 5000.0),
        );
        books.record(
            EntryDraft::new("2024-01-02", "Bank loan received")
                .debit("Cash", 2000.0)
                .credit("Bank Loan", 2000.0),
        );
        books.record(
            EntryDraft::new("2024-01-03", "Bought equipment")
                .debit("Equipment", 1500.0)
                .credit("Cash", 1500.0),
        );
        books.record(
            EntryDraft::new("2024-01-10", "Consulting sales")
                .debit("Cash", 1200.0)
                .credit("Sales", 1200.0),
        );
        books.record(
            EntryDraft::new("2024-01-31", "Office rent")
                .debit("Rent", 400.0)
                .credit("Cash", 400.0),
        );
        books
    }

    #[test]
    fn owner_investment_trial_balance() {
        let mut books = Books::new(&[("Cash", "Asset"), ("Owner's Equity", "Owner's Equity")]);
        books.record(
            EntryDraft::new("2024-01-01", "Owner investment")
                .debit("Cash", 1000.0)
                .credit("Owner's Equity", 1000.0),
        );
        let report = ReportService::trial_balance(&books.chart);
        assert_eq!(report.total_debits, 1000.0);
        assert_eq!(report.total_credits, 1000.0);
        assert!(report.is_balanced);
    }

    #[test]
    fn trial_balance_is_sorted_and_places_contra_balances() {
        let mut chart = ChartOfAccounts::new();
        AccountService::create(&mut chart, "Overdraft Cash", "Asset", -50.0).unwrap();
        AccountService::create(&mut chart, "Accrued", "Liability", 50.0).unwrap();
        let report = ReportService::trial_balance(&chart);
        assert_eq!(report.lines[0].account, "Accrued");
        assert_eq!(report.lines[1].credit, 50.0);
        assert_eq!(report.total_credits, 100.0);
        assert!(!report.is_balanced);
    }

    #[test]
    fn income_statement_nets_revenue_and_expenses() {
        let books = trading_books();
        let income = ReportService::income_statement(&books.chart);
        assert_eq!(income.total_revenue, 1200.0);
        assert_eq!(income.total_expenses, 400.0);
        assert_eq!(income.net_income, 800.0);
    }

    #[test]
    fn balance_sheet_includes_retained_earnings() {
        let books = trading_books();
        let sheet = ReportService::balance_sheet(&books.chart);
        assert_eq!(sheet.total_assets, 7800.0);
        assert_eq!(sheet.total_liabilities, 2000.0);
        assert_eq!(sheet.total_equity, 5800.0);
        assert!(sheet
            .equity
            .iter()
            .any(|line| line.account == RETAINED_EARNINGS_LABEL && line.amount == 800.0));
        assert!(sheet.is_balanced);
    }

    #[test]
    fn balance_sheet_skips_zero_retained_earnings() {
        let books = Books::new(&[("Cash", "Asset")]);
        let sheet = ReportService::balance_sheet(&books.chart);
        assert!(sheet.equity.is_empty());
    }

    #[test]
    fn cash_flow_buckets_by_narration() {
        let books = trading_books();
        let flow = ReportService::cash_flow(
            &books.chart,
            &books.book,
            &books.journal,
            DEFAULT_CASH_HINT,
            &KeywordClassifier::default(),
        )
        .unwrap();
        assert_eq!(flow.cash_account, "Cash");
        assert_eq!(flow.financing_cash, 7000.0);
        assert_eq!(flow.investing_cash, -1500.0);
        assert_eq!(flow.operating_cash, 800.0);
        assert_eq!(flow.net_cash_flow, 6300.0);
        assert_eq!(
            flow.net_cash_flow,
            AccountService::balance(&books.chart, "Cash").unwrap()
        );
    }

    #[test]
    fn cash_flow_accepts_custom_classifier() {
        let books = trading_books();
        let everything_operating = |_: &str| CashFlowCategory::Operating;
        let flow = ReportService::cash_flow(
            &books.chart,
            &books.book,
            &books.journal,
            DEFAULT_CASH_HINT,
            &everything_operating,
        )
        .unwrap();
        assert_eq!(flow.operating.len(), 5);
        assert!(flow.financing.is_empty());
    }

    #[test]
    fn cash_flow_requires_cash_account_and_history() {
        let books = Books::new(&[("Bank", "Asset")]);
        let err = ReportService::cash_flow(
            &books.chart,
            &books.book,
            &books.journal,
            DEFAULT_CASH_HINT,
            &KeywordClassifier::default(),
        )
        .unwrap_err();
        assert_eq!(err, ServiceError::NotFound("No Cash account found".into()));

        let books = Books::new(&[("Petty Cash", "Asset")]);
        let err = ReportService::cash_flow(
            &books.chart,
            &books.book,
            &books.journal,
            DEFAULT_CASH_HINT,
            &KeywordClassifier::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ServiceError::NotFound("No cash transactions found".into())
        );
    }

    #[test]
    fn ratios_use_statement_totals() {
        let books = trading_books();
        let ratios = ReportService::ratio_analysis(&books.chart);
        assert!((ratios.profit_margin - 800.0 / 1200.0 * 100.0).abs() < 1e-9);
        assert!((ratios.debt_ratio - 2000.0 / 7800.0 * 100.0).abs() < 1e-9);
        assert!((ratios.roe - 800.0 / 5800.0 * 100.0).abs() < 1e-9);
        assert_eq!(ratios.current_ratio, 1.0);
    }

    #[test]
    fn ratios_guard_empty_denominators() {
        let books = Books::new(&[("Cash", "Asset")]);
        let ratios = ReportService::ratio_analysis(&books.chart);
        assert_eq!(ratios.profit_margin, 0.0);
        assert_eq!(ratios.debt_ratio, 0.0);
        assert_eq!(ratios.roa, 0.0);
        assert_eq!(ratios.roe, 0.0);
    }

    #[test]
    fn keyword_classifier_prefers_financing() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify("Loan for new BUILDING"),
            CashFlowCategory::Financing
        );
        assert_eq!(
            classifier.classify("Sold old equipment"),
            CashFlowCategory::Investing
        );
        assert_eq!(
            classifier.classify("Paid wages"),
            CashFlowCategory::Operating
        );
    }
}
