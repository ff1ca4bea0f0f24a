//! Business logic helpers for managing accounts.

use uuid::Uuid;

use crate::{
    core::context::RequestContext,
    errors::{LedgerError, Result},
    ledger::{Account, AccountKind},
    storage::LedgerStore,
};

/// Provides validated CRUD helpers for accounts.
pub struct AccountService;

impl AccountService {
    /// Creates an account and returns the stored record.
    pub fn create(ctx: &RequestContext, name: &str, kind: AccountKind) -> Result<Account> {
        let name = valid_name(name)?;
        let account = Account::new(name, kind);
        ctx.store.upsert_account(&ctx.owner, &account)?;
        Ok(account)
    }

    /// Replaces the name and kind of an existing account.
    pub fn rename_retype(
        ctx: &RequestContext,
        id: Uuid,
        name: &str,
        kind: AccountKind,
    ) -> Result<Account> {
        let name = valid_name(name)?;
        let mut account = ctx
            .store
            .list_accounts(&ctx.owner)?
            .into_iter()
            .find(|row| row.id == id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.name = name.to_string();
        account.kind = kind;
        ctx.store.upsert_account(&ctx.owner, &account)?;
        Ok(account)
    }

    /// Removes the account. Transactions and rules pointing at it stay in
    /// place and simply drop out of aggregation until re-pointed.
    pub fn remove(ctx: &RequestContext, id: Uuid) -> Result<()> {
        if !ctx.store.delete_account(&ctx.owner, id)? {
            return Err(LedgerError::AccountNotFound(id));
        }
        Ok(())
    }

    pub fn list(ctx: &RequestContext) -> Result<Vec<Account>> {
        ctx.store.list_accounts(&ctx.owner)
    }
}

fn valid_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput(
            "account name must not be empty".into(),
        ));
    }
    Ok(trimmed)
}
