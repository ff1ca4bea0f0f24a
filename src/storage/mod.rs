pub mod json_backend;
pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::Result,
    ledger::{Account, DateWindow, LedgerSnapshot, RecurringRule, Transaction},
};

/// Identity of the person or tenant whose ledger a request operates on.
///
/// Callers obtain it from whatever authentication layer fronts the engine;
/// the engine itself only uses it to partition stored data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Abstraction over persistence backends holding per-owner ledger data.
///
/// Every method is scoped by [`OwnerId`]; one owner's rows are never visible
/// through another owner's calls. Batched writes are all-or-nothing: when a
/// batch fails, no row from that batch is persisted.
pub trait LedgerStore: Send + Sync {
    fn list_accounts(&self, owner: &OwnerId) -> Result<Vec<Account>>;
    fn upsert_account(&self, owner: &OwnerId, account: &Account) -> Result<()>;
    /// Removes the account if present. Returns whether anything was deleted.
    fn delete_account(&self, owner: &OwnerId, id: Uuid) -> Result<bool>;

    /// Lists transactions, optionally restricted to a half-open date window.
    fn list_transactions(
        &self,
        owner: &OwnerId,
        range: Option<DateWindow>,
    ) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Transaction>>;
    /// Persists the batch atomically and returns the committed rows.
    fn create_transactions(
        &self,
        owner: &OwnerId,
        rows: Vec<Transaction>,
    ) -> Result<Vec<Transaction>>;
    fn update_transaction(&self, owner: &OwnerId, row: &Transaction) -> Result<()>;
    /// Removes every listed id atomically and returns how many rows went away.
    fn delete_transactions(&self, owner: &OwnerId, ids: &[Uuid]) -> Result<usize>;

    fn list_rules(&self, owner: &OwnerId) -> Result<Vec<RecurringRule>>;
    fn create_rule(&self, owner: &OwnerId, rule: RecurringRule) -> Result<RecurringRule>;
    /// Removes the rule if present. Returns whether anything was deleted.
    fn delete_rule(&self, owner: &OwnerId, id: Uuid) -> Result<bool>;

    /// Reads the owner's accounts, transactions, and rules in one pass.
    fn snapshot(&self, owner: &OwnerId) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            accounts: self.list_accounts(owner)?,
            transactions: self.list_transactions(owner, None)?,
            rules: self.list_rules(owner)?,
        })
    }
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
