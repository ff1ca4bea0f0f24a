use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A financial account that ledger entries are booked against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
}

impl Account {
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Classifies every entry on an account as income or expense.
pub enum AccountKind {
    CreditCard,
    FixedDebt,
    Income,
    Other,
}

impl AccountKind {
    /// Only [`AccountKind::Income`] accounts count toward monthly income;
    /// every other kind is an expense regardless of the entry's sign.
    pub fn is_income(&self) -> bool {
        matches!(self, AccountKind::Income)
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountKind::CreditCard => "Credit Card",
            AccountKind::FixedDebt => "Fixed Debt",
            AccountKind::Income => "Income",
            AccountKind::Other => "Other",
        };
        f.write_str(label)
    }
}
