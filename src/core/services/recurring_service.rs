//! Business logic helpers for recurring rules.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    core::context::RequestContext,
    errors::{LedgerError, Result},
    ledger::RecurringRule,
    storage::LedgerStore,
};

use super::owned_account;

/// A rule joined with the display name of the account it charges.
///
/// The name is `None` when the account has since been deleted; the rule is
/// still listed so it can be cleaned up.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RuleSummary {
    pub rule: RecurringRule,
    pub account_name: Option<String>,
}

/// Provides validated create/delete/list helpers for recurring rules.
///
/// Rules are immutable once created; the only edit is delete-and-recreate.
pub struct RecurringService;

impl RecurringService {
    pub fn create(
        ctx: &RequestContext,
        account_id: Uuid,
        description: &str,
        value: f64,
        day_of_month: u32,
        start_date: NaiveDate,
    ) -> Result<RecurringRule> {
        let description = description.trim();
        if description.is_empty() {
            return Err(LedgerError::InvalidInput(
                "description must not be empty".into(),
            ));
        }
        if !(1..=31).contains(&day_of_month) {
            return Err(LedgerError::InvalidInput(
                "day_of_month must be between 1 and 31".into(),
            ));
        }
        owned_account(ctx, account_id)?;
        let rule = RecurringRule::new(account_id, description, value, day_of_month, start_date);
        ctx.store.create_rule(&ctx.owner, rule)
    }

    pub fn delete(ctx: &RequestContext, id: Uuid) -> Result<()> {
        if !ctx.store.delete_rule(&ctx.owner, id)? {
            return Err(LedgerError::RuleNotFound(id));
        }
        Ok(())
    }

    /// Lists every rule with its account name joined on.
    pub fn list(ctx: &RequestContext) -> Result<Vec<RuleSummary>> {
        let snapshot = ctx.snapshot()?;
        Ok(snapshot
            .rules
            .iter()
            .map(|rule| RuleSummary {
                account_name: snapshot
                    .account(rule.account_id)
                    .map(|account| account.name.clone()),
                rule: rule.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::services::AccountService,
        ledger::AccountKind,
        storage::{MemoryStore, OwnerId},
    };
    use std::sync::Arc;

    fn context() -> RequestContext {
        RequestContext::new(OwnerId::new("alice"), Arc::new(MemoryStore::new()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn create_validates_day_of_month_bounds() {
        let ctx = context();
        let account = AccountService::create(&ctx, "Rent", AccountKind::FixedDebt)
            .expect("account")
            .id;
        for day in [0, 32] {
            let err = RecurringService::create(&ctx, account, "Rent", 900.0, day, date(2024, 1, 1))
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)), "day {day}");
        }
        assert!(RecurringService::list(&ctx).expect("list").is_empty());
    }

    #[test]
    fn create_requires_owned_account() {
        let ctx = context();
        let err =
            RecurringService::create(&ctx, Uuid::new_v4(), "Rent", 900.0, 5, date(2024, 1, 1))
                .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn day_31_is_accepted_at_creation() {
        let ctx = context();
        let account = AccountService::create(&ctx, "Rent", AccountKind::FixedDebt)
            .expect("account")
            .id;
        let rule = RecurringService::create(&ctx, account, "Rent", 900.0, 31, date(2024, 1, 1))
            .expect("rule");
        assert_eq!(rule.day_of_month, 31);
    }

    #[test]
    fn delete_fails_closed_for_unknown_rule() {
        let ctx = context();
        let err = RecurringService::delete(&ctx, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, LedgerError::RuleNotFound(_)));
    }

    #[test]
    fn list_joins_account_names_and_tolerates_orphans() {
        let ctx = context();
        let account = AccountService::create(&ctx, "Rent", AccountKind::FixedDebt)
            .expect("account")
            .id;
        RecurringService::create(&ctx, account, "Rent", 900.0, 5, date(2024, 1, 1)).expect("rule");

        let listed = RecurringService::list(&ctx).expect("list");
        assert_eq!(listed[0].account_name.as_deref(), Some("Rent"));

        AccountService::remove(&ctx, account).expect("remove account");
        let listed = RecurringService::list(&ctx).expect("list again");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].account_name, None);
    }
}
