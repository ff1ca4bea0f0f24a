//! Business logic helpers for managing transactions.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::{
    core::context::RequestContext,
    errors::{LedgerError, Result},
    ledger::{
        future_slice, installment_rows, month_entries, DateWindow, LedgerEntry, MonthRef,
        Transaction,
    },
    storage::LedgerStore,
};

use super::owned_account;

/// Largest installment group a single purchase may be spread over.
pub const MAX_INSTALLMENTS: u32 = 480;

const MAX_START_YEAR: i32 = 9999;

/// How much of an installment group a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    /// Just the addressed transaction, even inside a group.
    Single,
    /// The addressed transaction plus every group member on or after its date.
    Future,
}

/// Field-by-field edit of a stored transaction. `None` keeps the stored
/// value. Installment membership is not editable through updates.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub account_id: Option<Uuid>,
    pub description: Option<String>,
    pub value: Option<f64>,
    pub date: Option<NaiveDate>,
}

/// Provides validated CRUD helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Creates a one-off transaction and returns the stored row.
    pub fn create_single(
        ctx: &RequestContext,
        account_id: Uuid,
        description: &str,
        value: f64,
        date: NaiveDate,
    ) -> Result<Transaction> {
        let description = valid_description(description)?;
        owned_account(ctx, account_id)?;
        let row = Transaction::new(account_id, description, value, date);
        let mut committed = ctx.store.create_transactions(&ctx.owner, vec![row])?;
        Ok(committed.remove(0))
    }

    /// Spreads one purchase over `count` consecutive months and persists the
    /// whole group atomically. Returns the committed rows in order. Group
    /// size is capped at `MAX_INSTALLMENTS` months.
    pub fn create_installments(
        ctx: &RequestContext,
        account_id: Uuid,
        description: &str,
        value: f64,
        start_date: NaiveDate,
        count: u32,
    ) -> Result<Vec<Transaction>> {
        let description = valid_description(description)?;
        if !(1..=MAX_INSTALLMENTS).contains(&count) {
            return Err(LedgerError::InvalidInput(format!(
                "installment count: must be 1-{MAX_INSTALLMENTS}, got {count}"
            )));
        }
        if start_date.year() > MAX_START_YEAR {
            return Err(LedgerError::InvalidInput(format!(
                "installment start year: must be {MAX_START_YEAR} or earlier, got {}",
                start_date.year()
            )));
        }
        owned_account(ctx, account_id)?;
        let rows = installment_rows(account_id, description, value, start_date, count);
        ctx.store.create_transactions(&ctx.owner, rows)
    }

    /// Applies a field-by-field edit. Group fields (`installment`,
    /// `purchase_id`) are preserved no matter what the edit carries.
    pub fn update(ctx: &RequestContext, id: Uuid, changes: TransactionUpdate) -> Result<Transaction> {
        let mut row = Self::get(ctx, id)?;
        if let Some(account_id) = changes.account_id {
            owned_account(ctx, account_id)?;
            row.account_id = account_id;
        }
        if let Some(description) = changes.description {
            row.description = valid_description(&description)?.to_string();
        }
        if let Some(value) = changes.value {
            row.value = value;
        }
        if let Some(date) = changes.date {
            row.date = date;
        }
        ctx.store.update_transaction(&ctx.owner, &row)?;
        Ok(row)
    }

    /// Deletes the addressed transaction, widening to the rest of its
    /// installment group when the scope says so. Returns how many rows were
    /// removed.
    pub fn delete_scoped(ctx: &RequestContext, id: Uuid, scope: DeleteScope) -> Result<usize> {
        let target = Self::get(ctx, id)?;
        let ids = match scope {
            DeleteScope::Single => vec![target.id],
            DeleteScope::Future => {
                let purchase_id = target.purchase_id.ok_or_else(|| {
                    LedgerError::InvalidInput(
                        "future-scoped delete needs an installment transaction".into(),
                    )
                })?;
                let all = ctx.store.list_transactions(&ctx.owner, None)?;
                future_slice(&all, purchase_id, target.date)
            }
        };
        ctx.store.delete_transactions(&ctx.owner, &ids)
    }

    pub fn get(ctx: &RequestContext, id: Uuid) -> Result<Transaction> {
        ctx.store
            .get_transaction(&ctx.owner, id)?
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    pub fn list(ctx: &RequestContext, range: Option<DateWindow>) -> Result<Vec<Transaction>> {
        ctx.store.list_transactions(&ctx.owner, range)
    }

    /// Lists one month the way statements show it: stored rows merged with
    /// that month's virtual occurrences, date-ordered, optionally narrowed
    /// to a single account.
    pub fn list_month(
        ctx: &RequestContext,
        month: MonthRef,
        account: Option<Uuid>,
    ) -> Result<Vec<LedgerEntry>> {
        let snapshot = ctx.snapshot()?;
        let mut entries = month_entries(&snapshot, month);
        if let Some(account_id) = account {
            entries.retain(|entry| entry.account_id == account_id);
        }
        Ok(entries)
    }
}

fn valid_description(description: &str) -> Result<&str> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput(
            "description must not be empty".into(),
        ));
    }
    Ok(trimmed)
}
