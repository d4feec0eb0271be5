//! Plain-text rendering for archived reports.

use chrono::NaiveDateTime;

use crate::currency::{format_percent, CurrencyFormat};

use super::{
    BalanceSheet, CashFlowItem, CashFlowStatement, IncomeStatement, RatioAnalysis, ReportKind,
    StatementLine, TrialBalance,
};

const WIDTH: usize = 80;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct TextReport<'a> {
    lines: Vec<String>,
    money: &'a CurrencyFormat,
}

impl<'a> TextReport<'a> {
    fn new(kind: ReportKind, generated: NaiveDateTime, money: &'a CurrencyFormat) -> Self {
        let mut report = Self {
            lines: Vec::new(),
            money,
        };
        report.rule('=');
        report.push(kind.title().to_uppercase());
        report.push(format!("Generated: {}", generated.format(TIMESTAMP_FORMAT)));
        report
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn rule(&mut self, ch: char) {
        self.lines.push(ch.to_string().repeat(WIDTH));
    }

    fn amount_row(&mut self, label: &str, amount: f64) {
        let value = self.money.format(amount);
        self.push(format!("  {label:<50} {value:>20}"));
    }

    fn section(&mut self, heading: &str, rows: &[StatementLine], total_label: &str, total: f64) {
        self.push(String::new());
        self.push(format!("{heading}:"));
        self.rule('-');
        for row in rows {
            self.amount_row(&row.account, row.amount);
        }
        self.rule('-');
        self.amount_row(total_label, total);
    }

    fn balance_check(&mut self, what: &str, balanced: bool) {
        if balanced {
            self.push(format!("[OK] {what} is balanced"));
        } else {
            self.push(format!("[!!] {what} is NOT balanced"));
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

pub fn render_trial_balance(
    report: &TrialBalance,
    generated: NaiveDateTime,
    money: &CurrencyFormat,
) -> String {
    let mut text = TextReport::new(ReportKind::TrialBalance, generated, money);
    text.rule('=');
    text.push(format!(
        "{:<40} {:<20} {:>15} {:>15}",
        "Account", "Type", "Debit", "Credit"
    ));
    text.rule('-');
    for line in &report.lines {
        let debit = if line.debit > 0.0 {
            money.format(line.debit)
        } else {
            String::new()
        };
        let credit = if line.credit > 0.0 {
            money.format(line.credit)
        } else {
            String::new()
        };
        text.push(format!(
            "{:<40} {:<20} {:>15} {:>15}",
            line.account,
            line.kind.label(),
            debit,
            credit
        ));
    }
    text.rule('-');
    text.push(format!(
        "{:<40} {:<20} {:>15} {:>15}",
        "TOTAL",
        "",
        money.format(report.total_debits),
        money.format(report.total_credits)
    ));
    text.rule('=');
    text.balance_check("Trial Balance", report.is_balanced);
    text.finish()
}

pub fn render_income_statement(
    report: &IncomeStatement,
    generated: NaiveDateTime,
    money: &CurrencyFormat,
) -> String {
    let mut text = TextReport::new(ReportKind::IncomeStatement, generated, money);
    text.rule('=');
    text.section("REVENUE", &report.revenue, "Total Revenue", report.total_revenue);
    text.section(
        "EXPENSES",
        &report.expenses,
        "Total Expenses",
        report.total_expenses,
    );
    text.push(String::new());
    text.rule('=');
    let label = if report.net_income >= 0.0 {
        "Net Income"
    } else {
        "Net Loss"
    };
    text.amount_row(label, report.net_income.abs());
    text.rule('=');
    text.finish()
}

pub fn render_balance_sheet(
    report: &BalanceSheet,
    generated: NaiveDateTime,
    money: &CurrencyFormat,
) -> String {
    let mut text = TextReport::new(ReportKind::BalanceSheet, generated, money);
    text.rule('=');
    text.section("ASSETS", &report.assets, "Total Assets", report.total_assets);
    text.section(
        "LIABILITIES",
        &report.liabilities,
        "Total Liabilities",
        report.total_liabilities,
    );
    text.section(
        "OWNER'S EQUITY",
        &report.equity,
        "Total Owner's Equity",
        report.total_equity,
    );
    text.push(String::new());
    text.rule('=');
    text.amount_row(
        "Total Liabilities + Equity",
        report.total_liabilities_and_equity(),
    );
    text.rule('=');
    text.balance_check("Balance Sheet", report.is_balanced);
    text.finish()
}

pub fn render_cash_flow(
    report: &CashFlowStatement,
    generated: NaiveDateTime,
    money: &CurrencyFormat,
) -> String {
    let mut text = TextReport::new(ReportKind::CashFlow, generated, money);
    text.push(format!("Cash Account: {}", report.cash_account));
    text.rule('=');
    let buckets: [(&str, &[CashFlowItem], &str, f64); 3] = [
        (
            "OPERATING ACTIVITIES",
            report.operating.as_slice(),
            "Net Cash from Operating Activities",
            report.operating_cash,
        ),
        (
            "INVESTING ACTIVITIES",
            report.investing.as_slice(),
            "Net Cash from Investing Activities",
            report.investing_cash,
        ),
        (
            "FINANCING ACTIVITIES",
            report.financing.as_slice(),
            "Net Cash from Financing Activities",
            report.financing_cash,
        ),
    ];
    for (heading, items, total_label, total) in buckets {
        text.push(String::new());
        text.push(format!("{heading}:"));
        text.rule('-');
        for item in items {
            let amount = money.format(item.signed_amount());
            text.push(format!(
                "  {} - {:<40} {:>20}",
                item.date, item.narration, amount
            ));
        }
        text.rule('-');
        text.amount_row(total_label, total);
    }
    text.push(String::new());
    text.rule('=');
    text.amount_row("Net Increase/Decrease in Cash", report.net_cash_flow);
    text.rule('=');
    text.finish()
}

pub fn render_ratio_analysis(
    report: &RatioAnalysis,
    generated: NaiveDateTime,
    money: &CurrencyFormat,
) -> String {
    let mut text = TextReport::new(ReportKind::RatioAnalysis, generated, money);
    text.rule('=');
    for (label, value) in [
        ("Profit Margin", report.profit_margin),
        ("Debt Ratio", report.debt_ratio),
        ("Return on Assets", report.roa),
        ("Return on Equity", report.roe),
    ] {
        text.push(format!("  {label:<50} {:>20}", format_percent(value)));
    }
    text.push(format!(
        "  {:<50} {:>20}",
        "Current Ratio",
        format!("{:.2}", report.current_ratio)
    ));
    text.rule('-');
    text.amount_row("Total Revenue", report.total_revenue);
    text.amount_row("Net Income", report.net_income);
    text.amount_row("Total Assets", report.total_assets);
    text.amount_row("Total Liabilities", report.total_liabilities);
    text.amount_row("Total Equity", report.total_equity);
    text.rule('=');
    text.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountType;
    use crate::reports::TrialBalanceLine;
    use chrono::NaiveDate;

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn trial_balance_text_lists_accounts_and_totals() {
        let report = TrialBalance {
            lines: vec![
                TrialBalanceLine {
                    account: "Cash".into(),
                    kind: AccountType::Asset,
                    debit: 1000.0,
                    credit: 0.0,
                },
                TrialBalanceLine {
                    account: "Owner's Equity".into(),
                    kind: AccountType::OwnersEquity,
                    debit: 0.0,
                    credit: 1000.0,
                },
            ],
            total_debits: 1000.0,
            total_credits: 1000.0,
            is_balanced: true,
        };
        let text = render_trial_balance(&report, generated(), &CurrencyFormat::default());
        assert!(text.contains("TRIAL BALANCE"));
        assert!(text.contains("Generated: 2024-01-31 09:30:00"));
        assert!(text.contains("$1,000.00"));
        assert!(text.contains("[OK] Trial Balance is balanced"));
    }

    #[test]
    fn income_statement_labels_losses() {
        let report = IncomeStatement {
            revenue: Vec::new(),
            expenses: vec![StatementLine {
                account: "Rent".into(),
                amount: 300.0,
            }],
            total_revenue: 0.0,
            total_expenses: 300.0,
            net_income: -300.0,
        };
        let text = render_income_statement(&report, generated(), &CurrencyFormat::default());
        assert!(text.contains("Net Loss"));
        assert!(text.contains("$300.00"));
    }
}
