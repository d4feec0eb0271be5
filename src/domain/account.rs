use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::common::{normalize_name, Displayable, NamedEntity};

/// Closed set of account classifications; the type alone decides the normal side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountType {
    Asset,
    Liability,
    Revenue,
    Expense,
    #[serde(rename = "Owner's Equity")]
    OwnersEquity,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Revenue,
        AccountType::Expense,
        AccountType::OwnersEquity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Revenue => "Revenue",
            AccountType::Expense => "Expense",
            AccountType::OwnersEquity => "Owner's Equity",
        }
    }

    /// The side that increases an account of this type.
    pub fn normal_side(self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense => EntrySide::Debit,
            AccountType::Liability | AccountType::Revenue | AccountType::OwnersEquity => {
                EntrySide::Credit
            }
        }
    }

    /// Applies one posted line to `balance` following the normal-side rule.
    pub fn apply(self, balance: f64, amount: f64, side: EntrySide) -> f64 {
        if side == self.normal_side() {
            balance + amount
        } else {
            balance - amount
        }
    }

    /// Splits a signed balance into its (debit, credit) trial-balance columns.
    ///
    /// A positive balance lands on the normal side; a negative (contra) balance lands on
    /// the opposite column as an absolute value.
    pub fn split_balance(self, balance: f64) -> (f64, f64) {
        let (normal, contra) = if balance >= 0.0 {
            (balance, 0.0)
        } else {
            (0.0, balance.abs())
        };
        match self.normal_side() {
            EntrySide::Debit => (normal, contra),
            EntrySide::Credit => (contra, normal),
        }
    }

    pub fn labels() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(value);
        if matches!(wanted.as_str(), "owners equity" | "owners' equity") {
            return Ok(AccountType::OwnersEquity);
        }
        AccountType::ALL
            .into_iter()
            .find(|kind| kind.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                format!(
                    "Invalid account type `{}`. Must be one of: {}",
                    value.trim(),
                    Self::labels()
                )
            })
    }
}

/// Side of a journal line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntrySide {
    Debit,
    Credit,
}

impl EntrySide {
    pub fn label(self) -> &'static str {
        match self {
            EntrySide::Debit => "Debit",
            EntrySide::Credit => "Credit",
        }
    }
}

impl fmt::Display for EntrySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named bucket in the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    name: String,
    #[serde(rename = "type")]
    kind: AccountType,
    #[serde(default)]
    balance: f64,
}

impl Account {
    pub fn new(name: impl Into<String>, kind: AccountType, balance: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            balance,
        }
    }

    pub fn kind(&self) -> AccountType {
        self.kind
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, balance: f64) {
        self.balance = balance;
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// The chart of accounts document.
///
/// Accounts keep their creation order; lookups go through a lowercased name index
/// that is rebuilt whenever the document is deserialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Account>", into = "Vec<Account>")]
pub struct ChartOfAccounts {
    accounts: Vec<Account>,
    index: HashMap<String, usize>,
}

impl PartialEq for ChartOfAccounts {
    fn eq(&self, other: &Self) -> bool {
        self.accounts == other.accounts
    }
}

impl TryFrom<Vec<Account>> for ChartOfAccounts {
    type Error = String;

    /// Rejects documents naming the same account twice (ignoring case).
    fn try_from(accounts: Vec<Account>) -> Result<Self, Self::Error> {
        let mut chart = ChartOfAccounts::default();
        for account in accounts {
            let name = account.name().to_string();
            if !chart.insert(account) {
                return Err(format!("duplicate account '{name}'"));
            }
        }
        Ok(chart)
    }
}

impl From<ChartOfAccounts> for Vec<Account> {
    fn from(chart: ChartOfAccounts) -> Self {
        chart.accounts
    }
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&normalize_name(name))
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, name: &str) -> Option<&Account> {
        self.index
            .get(&normalize_name(name))
            .and_then(|&slot| self.accounts.get(slot))
    }

    pub(crate) fn resolve_mut(&mut self, name: &str) -> Option<&mut Account> {
        let slot = *self.index.get(&normalize_name(name))?;
        self.accounts.get_mut(slot)
    }

    /// Returns the stored spelling for a case-insensitive name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.resolve(name).map(|account| account.name())
    }

    /// Adds an account; a name already present (ignoring case) is left untouched.
    pub(crate) fn insert(&mut self, account: Account) -> bool {
        let key = normalize_name(account.name());
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.accounts.len());
        self.accounts.push(account);
        true
    }

    pub(crate) fn reset_balances(&mut self) {
        for account in &mut self.accounts {
            account.set_balance(0.0);
        }
    }
}
