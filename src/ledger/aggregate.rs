//! Monthly aggregation: merges stored transactions with rule expansions and
//! folds them into per-account and global totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::{
    account::AccountKind,
    month::MonthRef,
    recurring::VirtualOccurrence,
    snapshot::LedgerSnapshot,
    transaction::{InstallmentDetails, Transaction},
};

/// How an entry entered the ledger.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Single,
    Installment,
    Recurring,
}

/// Unified view over a physical transaction and a virtual occurrence, as
/// produced by the month merge and consumed by aggregation and listings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerEntry {
    /// `None` for virtual occurrences; they have no stored row to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<Uuid>,
    pub account_id: Uuid,
    pub description: String,
    pub value: f64,
    pub date: NaiveDate,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment: Option<InstallmentDetails>,
}

impl LedgerEntry {
    fn from_transaction(txn: &Transaction) -> Self {
        Self {
            transaction_id: Some(txn.id),
            account_id: txn.account_id,
            description: txn.description.clone(),
            value: txn.value,
            date: txn.date,
            kind: if txn.is_installment() {
                EntryKind::Installment
            } else {
                EntryKind::Single
            },
            installment: txn.installment,
        }
    }

    fn from_occurrence(occurrence: VirtualOccurrence) -> Self {
        Self {
            transaction_id: None,
            account_id: occurrence.account_id,
            description: occurrence.description,
            value: occurrence.value,
            date: occurrence.date,
            kind: EntryKind::Recurring,
            installment: None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.kind == EntryKind::Recurring
    }
}

/// Merges the month's stored transactions with every rule's expansion for
/// that month, sorted by date. Physical rows keep their stored order within
/// a day; virtual occurrences follow them.
pub fn month_entries(snapshot: &LedgerSnapshot, month: MonthRef) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = snapshot
        .transactions
        .iter()
        .filter(|txn| month.contains(txn.date))
        .map(LedgerEntry::from_transaction)
        .collect();
    entries.extend(
        snapshot
            .rules
            .iter()
            .filter_map(|rule| rule.occurrence_in(month))
            .map(LedgerEntry::from_occurrence),
    );
    entries.sort_by_key(|entry| entry.date);
    entries
}

#[derive(Debug, Clone, Serialize, PartialEq)]
/// One account's total contribution to a month's detail list.
pub struct AccountActivity {
    pub account_name: String,
    pub account_kind: AccountKind,
    pub total: f64,
}

/// Global and per-account totals for a single month.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyAggregate {
    pub month: MonthRef,
    pub label: String,
    pub total_income: f64,
    pub total_expense: f64,
    pub month_net: f64,
    pub per_account: Vec<AccountActivity>,
}

/// Aggregates one month of activity. Pure function of the snapshot.
///
/// Every account's monthly total is folded into the income or expense total
/// according to the account kind, whatever its sign. The `per_account` detail
/// list keeps only strictly positive totals; that suppression is a display
/// policy inherited from the product and callers rely on it.
pub fn aggregate_month(snapshot: &LedgerSnapshot, month: MonthRef) -> MonthlyAggregate {
    let mut totals: HashMap<Uuid, f64> = HashMap::new();
    for entry in month_entries(snapshot, month) {
        if snapshot.account(entry.account_id).is_none() {
            warn!(
                account_id = %entry.account_id,
                date = %entry.date,
                "skipping ledger entry for missing account"
            );
            continue;
        }
        *totals.entry(entry.account_id).or_insert(0.0) += entry.value;
    }

    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut per_account = Vec::new();
    for account in &snapshot.accounts {
        let total = totals.get(&account.id).copied().unwrap_or(0.0);
        if account.kind.is_income() {
            total_income += total;
        } else {
            total_expense += total;
        }
        if total > 0.0 {
            per_account.push(AccountActivity {
                account_name: account.name.clone(),
                account_kind: account.kind,
                total,
            });
        }
    }

    MonthlyAggregate {
        month,
        label: month.label(),
        total_income,
        total_expense,
        month_net: total_income - total_expense,
        per_account,
    }
}
