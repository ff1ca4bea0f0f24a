use std::{
    collections::HashSet,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    errors::{LedgerError, Result},
    ledger::{Account, DateWindow, RecurringRule, Transaction},
    utils::{app_data_dir, ensure_dir},
};

use super::{LedgerStore, OwnerId};

const TMP_SUFFIX: &str = "tmp";
const ACCOUNTS_FILE: &str = "accounts";
const TRANSACTIONS_FILE: &str = "transactions";
const RECURRING_FILE: &str = "recurring";

/// JSON-file backend keeping one set of flat files per owner.
///
/// An owner id of `alice` is stored as `alice_accounts.json`,
/// `alice_transactions.json`, and `alice_recurring.json` under the root
/// directory; bytes a filename cannot safely carry are hex-escaped, and the
/// escaping never maps two distinct owner ids to the same file set. Every
/// write rewrites the whole file through a temp-and-rename pair, so a failed
/// write leaves the previous contents untouched.
#[derive(Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn owner_file(&self, owner: &OwnerId, kind: &str) -> PathBuf {
        self.root
            .join(format!("{}_{}.json", owner_key(owner.as_str()), kind))
    }

    fn read_owner_rows<T: DeserializeOwned>(&self, owner: &OwnerId, kind: &str) -> Result<Vec<T>> {
        read_rows(&self.owner_file(owner, kind))
    }

    fn write_owner_rows<T: Serialize>(&self, owner: &OwnerId, kind: &str, rows: &[T]) -> Result<()> {
        write_rows(&self.owner_file(owner, kind), rows)
    }
}

impl LedgerStore for JsonStore {
    fn list_accounts(&self, owner: &OwnerId) -> Result<Vec<Account>> {
        self.read_owner_rows(owner, ACCOUNTS_FILE)
    }

    fn upsert_account(&self, owner: &OwnerId, account: &Account) -> Result<()> {
        let mut accounts: Vec<Account> = self.read_owner_rows(owner, ACCOUNTS_FILE)?;
        match accounts.iter_mut().find(|row| row.id == account.id) {
            Some(existing) => *existing = account.clone(),
            None => accounts.push(account.clone()),
        }
        self.write_owner_rows(owner, ACCOUNTS_FILE, &accounts)
    }

    fn delete_account(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let mut accounts: Vec<Account> = self.read_owner_rows(owner, ACCOUNTS_FILE)?;
        let before = accounts.len();
        accounts.retain(|row| row.id != id);
        if accounts.len() == before {
            return Ok(false);
        }
        self.write_owner_rows(owner, ACCOUNTS_FILE, &accounts)?;
        Ok(true)
    }

    fn list_transactions(
        &self,
        owner: &OwnerId,
        range: Option<DateWindow>,
    ) -> Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self.read_owner_rows(owner, TRANSACTIONS_FILE)?;
        if let Some(window) = range {
            rows.retain(|row| window.contains(row.date));
        }
        Ok(rows)
    }

    fn get_transaction(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Transaction>> {
        let rows: Vec<Transaction> = self.read_owner_rows(owner, TRANSACTIONS_FILE)?;
        Ok(rows.into_iter().find(|row| row.id == id))
    }

    fn create_transactions(
        &self,
        owner: &OwnerId,
        rows: Vec<Transaction>,
    ) -> Result<Vec<Transaction>> {
        let mut stored: Vec<Transaction> = self.read_owner_rows(owner, TRANSACTIONS_FILE)?;
        stored.extend(rows.iter().cloned());
        self.write_owner_rows(owner, TRANSACTIONS_FILE, &stored)?;
        Ok(rows)
    }

    fn update_transaction(&self, owner: &OwnerId, row: &Transaction) -> Result<()> {
        let mut stored: Vec<Transaction> = self.read_owner_rows(owner, TRANSACTIONS_FILE)?;
        let slot = stored
            .iter_mut()
            .find(|existing| existing.id == row.id)
            .ok_or(LedgerError::TransactionNotFound(row.id))?;
        *slot = row.clone();
        self.write_owner_rows(owner, TRANSACTIONS_FILE, &stored)
    }

    fn delete_transactions(&self, owner: &OwnerId, ids: &[Uuid]) -> Result<usize> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        let mut stored: Vec<Transaction> = self.read_owner_rows(owner, TRANSACTIONS_FILE)?;
        let before = stored.len();
        stored.retain(|row| !wanted.contains(&row.id));
        let removed = before - stored.len();
        if removed > 0 {
            self.write_owner_rows(owner, TRANSACTIONS_FILE, &stored)?;
        }
        Ok(removed)
    }

    fn list_rules(&self, owner: &OwnerId) -> Result<Vec<RecurringRule>> {
        self.read_owner_rows(owner, RECURRING_FILE)
    }

    fn create_rule(&self, owner: &OwnerId, rule: RecurringRule) -> Result<RecurringRule> {
        let mut stored: Vec<RecurringRule> = self.read_owner_rows(owner, RECURRING_FILE)?;
        stored.push(rule.clone());
        self.write_owner_rows(owner, RECURRING_FILE, &stored)?;
        Ok(rule)
    }

    fn delete_rule(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let mut stored: Vec<RecurringRule> = self.read_owner_rows(owner, RECURRING_FILE)?;
        let before = stored.len();
        stored.retain(|row| row.id != id);
        if stored.len() == before {
            return Ok(false);
        }
        self.write_owner_rows(owner, RECURRING_FILE, &stored)?;
        Ok(true)
    }
}

/// Reads a JSON array of rows, tolerating damage: a missing or unreadable
/// file yields an empty list, and individual rows that fail to decode are
/// skipped with a warning instead of failing the whole read.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<serde_json::Value> = match serde_json::from_str(&data) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(path = %path.display(), %err, "stored file is not a JSON array, treating as empty");
            return Ok(Vec::new());
        }
    };
    let mut rows = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(row) => rows.push(row),
            Err(err) => {
                warn!(path = %path.display(), index, %err, "skipping malformed stored row");
            }
        }
    }
    Ok(rows)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|err| LedgerError::WriteFailed(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json).map_err(|err| LedgerError::WriteFailed(err.to_string()))?;
    fs::rename(&tmp, path).map_err(|err| LedgerError::WriteFailed(err.to_string()))?;
    Ok(())
}

fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Maps an owner id to a filename-safe key. Lowercase letters, digits, and
/// `-` pass through; every other byte is written as `_` plus two hex digits.
/// The escape marker itself is escaped, so no two owner ids share a key.
fn owner_key(raw: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut key = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => key.push(byte as char),
            other => {
                key.push('_');
                key.push(HEX[(other >> 4) as usize] as char);
                key.push(HEX[(other & 0x0f) as usize] as char);
            }
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountKind;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::new(Some(temp.path().to_path_buf())).expect("json store");
        (store, temp)
    }

    fn owner() -> OwnerId {
        OwnerId::new("alice")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn save_and_list_accounts_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        let account = Account::new("Salary", AccountKind::Income);
        store.upsert_account(&owner(), &account).expect("upsert");
        let listed = store.list_accounts(&owner()).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, account.id);
        assert_eq!(listed[0].name, "Salary");
    }

    #[test]
    fn upsert_replaces_existing_account_in_place() {
        let (store, _guard) = store_with_temp_dir();
        let mut account = Account::new("Card", AccountKind::CreditCard);
        store.upsert_account(&owner(), &account).expect("insert");
        account.name = "Gold Card".into();
        store.upsert_account(&owner(), &account).expect("update");
        let listed = store.list_accounts(&owner()).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Gold Card");
    }

    #[test]
    fn missing_files_read_as_empty() {
        let (store, _guard) = store_with_temp_dir();
        assert!(store.list_accounts(&owner()).expect("accounts").is_empty());
        assert!(store
            .list_transactions(&owner(), None)
            .expect("transactions")
            .is_empty());
        assert!(store.list_rules(&owner()).expect("rules").is_empty());
    }

    #[test]
    fn owners_are_isolated_by_file() {
        let (store, _guard) = store_with_temp_dir();
        let alice = OwnerId::new("alice");
        let bob = OwnerId::new("bob");
        store
            .upsert_account(&alice, &Account::new("Salary", AccountKind::Income))
            .expect("alice account");
        assert!(store.list_accounts(&bob).expect("bob accounts").is_empty());
        assert_eq!(store.list_accounts(&alice).expect("alice accounts").len(), 1);
    }

    #[test]
    fn malformed_rows_are_skipped_on_read() {
        let (store, _guard) = store_with_temp_dir();
        let account = Account::new("Rent", AccountKind::FixedDebt);
        let payload = json!([
            serde_json::to_value(&account).expect("encode account"),
            { "name": "missing the rest" },
        ]);
        let path = store.owner_file(&owner(), ACCOUNTS_FILE);
        fs::write(&path, serde_json::to_string(&payload).expect("encode")).expect("seed file");

        let listed = store.list_accounts(&owner()).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, account.id);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let (store, _guard) = store_with_temp_dir();
        let path = store.owner_file(&owner(), TRANSACTIONS_FILE);
        fs::write(&path, "not json at all").expect("seed file");
        assert!(store
            .list_transactions(&owner(), None)
            .expect("transactions")
            .is_empty());
    }

    #[test]
    fn delete_transactions_reports_removed_count() {
        let (store, _guard) = store_with_temp_dir();
        let account = Account::new("Card", AccountKind::CreditCard);
        let keep = Transaction::new(account.id, "Keep", 10.0, date(2024, 3, 1));
        let drop_one = Transaction::new(account.id, "Drop", 20.0, date(2024, 3, 2));
        store
            .create_transactions(&owner(), vec![keep.clone(), drop_one.clone()])
            .expect("create");

        let removed = store
            .delete_transactions(&owner(), &[drop_one.id, Uuid::new_v4()])
            .expect("delete");
        assert_eq!(removed, 1);
        let left = store.list_transactions(&owner(), None).expect("list");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, keep.id);
    }

    #[test]
    fn update_missing_transaction_fails() {
        let (store, _guard) = store_with_temp_dir();
        let ghost = Transaction::new(Uuid::new_v4(), "Ghost", 5.0, date(2024, 1, 1));
        let err = store.update_transaction(&owner(), &ghost).unwrap_err();
        assert!(matches!(err, LedgerError::TransactionNotFound(id) if id == ghost.id));
    }

    #[test]
    fn list_transactions_honours_date_window() {
        let (store, _guard) = store_with_temp_dir();
        let account = Account::new("Card", AccountKind::CreditCard);
        store
            .create_transactions(
                &owner(),
                vec![
                    Transaction::new(account.id, "In", 10.0, date(2024, 3, 15)),
                    Transaction::new(account.id, "Out", 10.0, date(2024, 4, 1)),
                ],
            )
            .expect("create");
        let window = DateWindow::new(date(2024, 3, 1), date(2024, 4, 1)).expect("window");
        let rows = store
            .list_transactions(&owner(), Some(window))
            .expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "In");
    }

    #[test]
    fn no_temp_files_left_after_write() {
        let (store, _guard) = store_with_temp_dir();
        store
            .upsert_account(&owner(), &Account::new("Salary", AccountKind::Income))
            .expect("upsert");
        let leftovers: Vec<_> = fs::read_dir(store.base_dir())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext == TMP_SUFFIX)
                    .unwrap_or(false)
            })
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn owner_keys_escape_everything_outside_the_safe_set() {
        assert_eq!(owner_key("alice"), "alice");
        assert_eq!(owner_key("team-7"), "team-7");
        assert_eq!(owner_key("user@a.com"), "user_40a_2ecom");
        assert_eq!(owner_key("user_a.com"), "user_5fa_2ecom");
        assert_eq!(owner_key("Alice"), "_41lice");
    }

    #[test]
    fn lookalike_owner_ids_never_share_files() {
        let (store, _guard) = store_with_temp_dir();
        let mail = OwnerId::new("user@a.com");
        let lookalike = OwnerId::new("user_a.com");
        store
            .upsert_account(&mail, &Account::new("Mail Savings", AccountKind::Other))
            .expect("mail owner account");

        assert!(store
            .list_accounts(&lookalike)
            .expect("lookalike accounts")
            .is_empty());
        let kept = store.list_accounts(&mail).expect("mail accounts");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Mail Savings");
    }
}
