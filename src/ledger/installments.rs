//! Installment groups: one purchase spread across consecutive months.

use chrono::NaiveDate;
use uuid::Uuid;

use super::{
    month::add_months,
    transaction::{InstallmentDetails, Transaction},
};

/// Expands one purchase into `count` rows sharing a freshly generated
/// purchase id. Row `i` is dated `i` calendar months after `start_date`
/// (day-of-month clamped to the month end when the target month is shorter)
/// and tagged `current = i + 1` over `total = count`.
///
/// The rows are built in memory only; persisting them atomically is the
/// store's job.
pub fn installment_rows(
    account_id: Uuid,
    description: &str,
    value: f64,
    start_date: NaiveDate,
    count: u32,
) -> Vec<Transaction> {
    let purchase_id = Uuid::new_v4();
    (0..count)
        .map(|index| {
            let mut txn = Transaction::new(
                account_id,
                description,
                value,
                add_months(start_date, index),
            );
            txn.installment = Some(InstallmentDetails {
                current: index + 1,
                total: count,
            });
            txn.purchase_id = Some(purchase_id);
            txn
        })
        .collect()
}

/// Ids of every row in the purchase group dated on or after `from_date`:
/// the selection behind future-scoped deletion. Earlier installments and
/// rows of other groups are never included.
pub fn future_slice(
    transactions: &[Transaction],
    purchase_id: Uuid,
    from_date: NaiveDate,
) -> Vec<Uuid> {
    transactions
        .iter()
        .filter(|txn| txn.purchase_id == Some(purchase_id) && txn.date >= from_date)
        .map(|txn| txn.id)
        .collect()
}
