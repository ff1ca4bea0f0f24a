use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{account::Account, recurring::RecurringRule, transaction::Transaction};

/// One owner's full raw ledger data, read in a single pass from the store.
///
/// Every read-side computation consumes a snapshot and nothing else, so
/// concurrent requests never share mutable state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub rules: Vec<RecurringRule>,
}

impl LedgerSnapshot {
    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }
}
