//! Ledger domain models and the pure aggregation/projection engine.

pub mod account;
pub mod aggregate;
pub mod installments;
pub mod month;
pub mod projection;
pub mod recurring;
pub mod snapshot;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use aggregate::{
    aggregate_month, month_entries, AccountActivity, EntryKind, LedgerEntry, MonthlyAggregate,
};
pub use installments::{future_slice, installment_rows};
pub use month::{add_months, days_in_month, DateWindow, MonthRef};
pub use projection::{
    opening_balance, panorama, MonthOutlook, DEFAULT_HORIZON_MONTHS, MAX_HORIZON_MONTHS,
};
pub use recurring::{RecurringRule, VirtualOccurrence};
pub use snapshot::LedgerSnapshot;
pub use transaction::{InstallmentDetails, Transaction};
