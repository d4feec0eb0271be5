use tracing::info;

use crate::domain::account::{Account, AccountType, ChartOfAccounts, EntrySide};
use crate::domain::common::NamedEntity;

use super::{ServiceError, ServiceResult};

/// Owns every rule about creating accounts and moving their balances.
pub struct AccountService;

impl AccountService {
    /// Adds a new account; names are unique ignoring case.
    pub fn create(
        chart: &mut ChartOfAccounts,
        name: &str,
        kind: &str,
        initial_balance: f64,
    ) -> ServiceResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("Account name cannot be empty"));
        }
        let kind: AccountType = kind.parse().map_err(ServiceError::InvalidInput)?;
        if !initial_balance.is_finite() {
            return Err(ServiceError::invalid(format!(
                "Invalid initial balance: {initial_balance}"
            )));
        }
        if chart.contains(name) {
            return Err(ServiceError::conflict(format!(
                "Account '{name}' already exists"
            )));
        }
        let account = Account::new(name, kind, initial_balance);
        chart.insert(account.clone());
        info!(account = name, kind = %kind, "account created");
        Ok(account)
    }

    /// All accounts, optionally restricted to one type, in creation order.
    pub fn list(chart: &ChartOfAccounts, kind: Option<AccountType>) -> Vec<&Account> {
        chart
            .iter()
            .filter(|account| kind.map_or(true, |wanted| account.kind() == wanted))
            .collect()
    }

    pub fn balance(chart: &ChartOfAccounts, name: &str) -> ServiceResult<f64> {
        chart
            .resolve(name)
            .map(Account::balance)
            .ok_or_else(|| missing(name))
    }

    /// Applies one line to the named account and returns its new balance.
    ///
    /// Posting stages its lines first and then stores the results through `set_balance`.
    pub fn apply_entry(
        chart: &mut ChartOfAccounts,
        name: &str,
        amount: f64,
        side: EntrySide,
    ) -> ServiceResult<f64> {
        Self::check_amount(amount)?;
        let account = chart.resolve_mut(name).ok_or_else(|| missing(name))?;
        let updated = account.kind().apply(account.balance(), amount, side);
        account.set_balance(updated);
        Ok(updated)
    }

    /// Line amounts must be finite and strictly positive.
    pub fn check_amount(amount: f64) -> ServiceResult<()> {
        if amount.is_finite() && amount > 0.0 {
            Ok(())
        } else {
            Err(ServiceError::invalid(format!("Invalid amount: {amount}")))
        }
    }

    /// Stores a balance the posting engine already computed with the normal-side rule.
    pub(crate) fn set_balance(
        chart: &mut ChartOfAccounts,
        name: &str,
        balance: f64,
    ) -> ServiceResult<()> {
        let account = chart.resolve_mut(name).ok_or_else(|| missing(name))?;
        account.set_balance(balance);
        Ok(())
    }

    /// Stored spelling of an account name.
    pub fn resolve_name(chart: &ChartOfAccounts, name: &str) -> ServiceResult<String> {
        chart
            .resolve(name)
            .map(|account| account.name().to_string())
            .ok_or_else(|| missing(name))
    }
}

pub(crate) fn missing(name: &str) -> ServiceError {
    ServiceError::not_found(format!("Account '{name}' does not exist"))
}
