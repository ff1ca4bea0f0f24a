use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::{
    errors::{LedgerError, Result},
    ledger::{Account, DateWindow, RecurringRule, Transaction},
};

use super::{LedgerStore, OwnerId};

#[derive(Debug, Default, Clone)]
struct OwnerRecords {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    rules: Vec<RecurringRule>,
}

/// In-memory backend with the same owner scoping as [`super::JsonStore`].
///
/// Used by tests and embedders that do not want files on disk. Mutations on
/// one owner never touch another owner's records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<OwnerId, OwnerRecords>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<OwnerId, OwnerRecords>> {
        self.inner.lock().expect("owner table poisoned")
    }
}

impl LedgerStore for MemoryStore {
    fn list_accounts(&self, owner: &OwnerId) -> Result<Vec<Account>> {
        let table = self.table();
        Ok(table
            .get(owner)
            .map(|records| records.accounts.clone())
            .unwrap_or_default())
    }

    fn upsert_account(&self, owner: &OwnerId, account: &Account) -> Result<()> {
        let mut table = self.table();
        let records = table.entry(owner.clone()).or_default();
        match records.accounts.iter_mut().find(|row| row.id == account.id) {
            Some(existing) => *existing = account.clone(),
            None => records.accounts.push(account.clone()),
        }
        Ok(())
    }

    fn delete_account(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let mut table = self.table();
        let records = table.entry(owner.clone()).or_default();
        let before = records.accounts.len();
        records.accounts.retain(|row| row.id != id);
        Ok(records.accounts.len() != before)
    }

    fn list_transactions(
        &self,
        owner: &OwnerId,
        range: Option<DateWindow>,
    ) -> Result<Vec<Transaction>> {
        let table = self.table();
        let mut rows = table
            .get(owner)
            .map(|records| records.transactions.clone())
            .unwrap_or_default();
        if let Some(window) = range {
            rows.retain(|row| window.contains(row.date));
        }
        Ok(rows)
    }

    fn get_transaction(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Transaction>> {
        let table = self.table();
        Ok(table
            .get(owner)
            .and_then(|records| records.transactions.iter().find(|row| row.id == id).cloned()))
    }

    fn create_transactions(
        &self,
        owner: &OwnerId,
        rows: Vec<Transaction>,
    ) -> Result<Vec<Transaction>> {
        let mut table = self.table();
        let records = table.entry(owner.clone()).or_default();
        records.transactions.extend(rows.iter().cloned());
        Ok(rows)
    }

    fn update_transaction(&self, owner: &OwnerId, row: &Transaction) -> Result<()> {
        let mut table = self.table();
        let records = table.entry(owner.clone()).or_default();
        let slot = records
            .transactions
            .iter_mut()
            .find(|existing| existing.id == row.id)
            .ok_or(LedgerError::TransactionNotFound(row.id))?;
        *slot = row.clone();
        Ok(())
    }

    fn delete_transactions(&self, owner: &OwnerId, ids: &[Uuid]) -> Result<usize> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        let mut table = self.table();
        let records = table.entry(owner.clone()).or_default();
        let before = records.transactions.len();
        records.transactions.retain(|row| !wanted.contains(&row.id));
        Ok(before - records.transactions.len())
    }

    fn list_rules(&self, owner: &OwnerId) -> Result<Vec<RecurringRule>> {
        let table = self.table();
        Ok(table
            .get(owner)
            .map(|records| records.rules.clone())
            .unwrap_or_default())
    }

    fn create_rule(&self, owner: &OwnerId, rule: RecurringRule) -> Result<RecurringRule> {
        let mut table = self.table();
        let records = table.entry(owner.clone()).or_default();
        records.rules.push(rule.clone());
        Ok(rule)
    }

    fn delete_rule(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let mut table = self.table();
        let records = table.entry(owner.clone()).or_default();
        let before = records.rules.len();
        records.rules.retain(|row| row.id != id);
        Ok(records.rules.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn records_are_scoped_per_owner() {
        let store = MemoryStore::new();
        let alice = OwnerId::new("alice");
        let bob = OwnerId::new("bob");
        store
            .upsert_account(&alice, &Account::new("Salary", AccountKind::Income))
            .expect("alice account");
        assert!(store.list_accounts(&bob).expect("bob accounts").is_empty());
    }

    #[test]
    fn snapshot_collects_all_record_kinds() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("alice");
        let account = Account::new("Card", AccountKind::CreditCard);
        store.upsert_account(&owner, &account).expect("account");
        store
            .create_transactions(
                &owner,
                vec![Transaction::new(account.id, "Coffee", 3.5, date(2024, 3, 4))],
            )
            .expect("transactions");
        store
            .create_rule(
                &owner,
                RecurringRule::new(account.id, "Streaming", 10.0, 1, date(2024, 1, 1)),
            )
            .expect("rule");

        let snapshot = store.snapshot(&owner).expect("snapshot");
        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.rules.len(), 1);
    }

    #[test]
    fn delete_rule_reports_presence() {
        let store = MemoryStore::new();
        let owner = OwnerId::new("alice");
        let rule = RecurringRule::new(Uuid::new_v4(), "Rent", 900.0, 1, date(2024, 1, 1));
        store.create_rule(&owner, rule.clone()).expect("rule");
        assert!(store.delete_rule(&owner, rule.id).expect("first delete"));
        assert!(!store.delete_rule(&owner, rule.id).expect("second delete"));
    }
}
