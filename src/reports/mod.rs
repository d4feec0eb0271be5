//! Derived financial statements.
//!
//! Every type here is a read-only projection of account balances and ledger history;
//! computing one never mutates the books.

pub mod render;

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::account::{AccountType, EntrySide};

/// The five statements the books can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    TrialBalance,
    IncomeStatement,
    BalanceSheet,
    CashFlow,
    RatioAnalysis,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::TrialBalance,
        ReportKind::IncomeStatement,
        ReportKind::BalanceSheet,
        ReportKind::CashFlow,
        ReportKind::RatioAnalysis,
    ];

    /// Key under which the rendered text is archived.
    pub fn sink_name(self) -> &'static str {
        match self {
            ReportKind::TrialBalance => "trial_balance",
            ReportKind::IncomeStatement => "income_statement",
            ReportKind::BalanceSheet => "balance_sheet",
            ReportKind::CashFlow => "cashflow",
            ReportKind::RatioAnalysis => "ratio_analysis",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::TrialBalance => "Trial Balance",
            ReportKind::IncomeStatement => "Income Statement",
            ReportKind::BalanceSheet => "Balance Sheet",
            ReportKind::CashFlow => "Cash Flow Statement",
            ReportKind::RatioAnalysis => "Ratio Analysis",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialBalanceLine {
    pub account: String,
    pub kind: AccountType,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialBalance {
    pub lines: Vec<TrialBalanceLine>,
    pub total_debits: f64,
    pub total_credits: f64,
    pub is_balanced: bool,
}

/// One account and its balance inside a statement section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementLine {
    pub account: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeStatement {
    pub revenue: Vec<StatementLine>,
    pub expenses: Vec<StatementLine>,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheet {
    pub assets: Vec<StatementLine>,
    pub liabilities: Vec<StatementLine>,
    pub equity: Vec<StatementLine>,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub total_equity: f64,
    pub is_balanced: bool,
}

impl BalanceSheet {
    pub fn total_liabilities_and_equity(&self) -> f64 {
        self.total_liabilities + self.total_equity
    }
}

/// Cash-flow bucket assigned to a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CashFlowCategory {
    Operating,
    Investing,
    Financing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowItem {
    pub date: NaiveDate,
    pub je_id: String,
    pub narration: String,
    pub amount: f64,
    pub side: EntrySide,
}

impl CashFlowItem {
    /// Debits bring cash in, credits take it out.
    pub fn signed_amount(&self) -> f64 {
        match self.side {
            EntrySide::Debit => self.amount,
            EntrySide::Credit => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowStatement {
    pub cash_account: String,
    pub operating: Vec<CashFlowItem>,
    pub investing: Vec<CashFlowItem>,
    pub financing: Vec<CashFlowItem>,
    pub operating_cash: f64,
    pub investing_cash: f64,
    pub financing_cash: f64,
    pub net_cash_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioAnalysis {
    pub profit_margin: f64,
    pub debt_ratio: f64,
    pub current_ratio: f64,
    pub roa: f64,
    pub roe: f64,
    pub total_revenue: f64,
    pub net_income: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub total_equity: f64,
}

/// A computed report plus the result of archiving its rendered text.
///
/// Archiving can fail without invalidating `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome<T> {
    pub data: T,
    pub text: String,
    pub archived: bool,
    pub message: String,
}
