pub mod account_service;
pub mod recurring_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use recurring_service::{RecurringService, RuleSummary};
pub use summary_service::SummaryService;
pub use transaction_service::{DeleteScope, TransactionService, TransactionUpdate};

use uuid::Uuid;

use crate::{
    core::context::RequestContext,
    errors::{LedgerError, Result},
    ledger::Account,
    storage::LedgerStore,
};

/// Resolves `account_id` against the caller's own accounts.
///
/// Used when validating references on incoming rows; a foreign or unknown id
/// is an input error, reported before anything is written.
pub(crate) fn owned_account(ctx: &RequestContext, account_id: Uuid) -> Result<Account> {
    ctx.store
        .list_accounts(&ctx.owner)?
        .into_iter()
        .find(|row| row.id == account_id)
        .ok_or_else(|| {
            LedgerError::InvalidInput(format!(
                "account_id {account_id} does not reference an account you own"
            ))
        })
}
