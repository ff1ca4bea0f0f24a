//! Balance projection: month-by-month replay of the whole ledger history.
//!
//! There is no persisted running balance and no cache. Every projection
//! replays from the raw snapshot, which is what keeps rule and transaction
//! edits instantly consistent across all computed history.

use serde::Serialize;

use super::{
    aggregate::{aggregate_month, AccountActivity, MonthlyAggregate},
    month::MonthRef,
    snapshot::LedgerSnapshot,
};

pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Longest projection a caller may request, in months.
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// The earliest month carrying any activity: the minimum over transaction
/// dates and rule start dates, truncated to months.
fn earliest_activity_month(snapshot: &LedgerSnapshot) -> Option<MonthRef> {
    let transaction_months = snapshot
        .transactions
        .iter()
        .map(|txn| MonthRef::from_date(txn.date));
    let rule_months = snapshot.rules.iter().map(|rule| rule.start_month());
    transaction_months.chain(rule_months).min()
}

/// Net cumulative effect of all activity strictly before `target`, obtained
/// by replaying every month from the earliest recorded activity. An owner
/// with no activity, or a target at or before the first activity month,
/// projects to zero.
pub fn opening_balance(snapshot: &LedgerSnapshot, target: MonthRef) -> f64 {
    let mut cursor = match earliest_activity_month(snapshot) {
        Some(month) => month,
        None => return 0.0,
    };
    let mut balance = 0.0;
    while cursor < target {
        let aggregate = aggregate_month(snapshot, cursor);
        balance += aggregate.total_income - aggregate.total_expense;
        cursor = cursor.next();
    }
    balance
}

#[derive(Debug, Clone, Serialize, PartialEq)]
/// One month of the forward projection, with the running balance threaded in.
pub struct MonthOutlook {
    pub month: MonthRef,
    pub label: String,
    pub total_income: f64,
    pub total_expense: f64,
    pub month_net: f64,
    pub cumulative_balance: f64,
    pub per_account: Vec<AccountActivity>,
}

impl MonthOutlook {
    fn from_aggregate(aggregate: MonthlyAggregate, cumulative_balance: f64) -> Self {
        Self {
            month: aggregate.month,
            label: aggregate.label,
            total_income: aggregate.total_income,
            total_expense: aggregate.total_expense,
            month_net: aggregate.month_net,
            cumulative_balance,
            per_account: aggregate.per_account,
        }
    }
}

/// Projects `horizon_months` months forward from `start`, seeding the running
/// balance with the opening balance for `start`. Accumulation is a strict
/// sequential fold: each month's cumulative balance builds on the previous.
pub fn panorama(
    snapshot: &LedgerSnapshot,
    start: MonthRef,
    horizon_months: u32,
) -> Vec<MonthOutlook> {
    let mut running = opening_balance(snapshot, start);
    let mut series = Vec::with_capacity(horizon_months as usize);
    for step in 0..horizon_months {
        let aggregate = aggregate_month(snapshot, start.plus(step));
        running += aggregate.month_net;
        series.push(MonthOutlook::from_aggregate(aggregate, running));
    }
    series
}
