//! Read-side entry points: aggregates, opening balances, panoramas.

use crate::{
    core::{clock::Clock, context::RequestContext},
    errors::{LedgerError, Result},
    ledger::{
        aggregate_month, opening_balance, panorama, MonthOutlook, MonthRef, MonthlyAggregate,
        MAX_HORIZON_MONTHS,
    },
};

/// Thin orchestration over the pure engine: load one snapshot, compute.
///
/// Every call replays from raw rows, so rule and transaction edits show up
/// in the very next summary with no reconciliation step.
pub struct SummaryService;

impl SummaryService {
    /// Cumulative balance carried into the first day of `target`.
    pub fn opening_balance(ctx: &RequestContext, target: MonthRef) -> Result<f64> {
        let target = MonthRef::new(target.year, target.month)?;
        let snapshot = ctx.snapshot()?;
        Ok(opening_balance(&snapshot, target))
    }

    /// Income, expense, and per-account detail for one month.
    pub fn month_aggregate(ctx: &RequestContext, month: MonthRef) -> Result<MonthlyAggregate> {
        let month = MonthRef::new(month.year, month.month)?;
        let snapshot = ctx.snapshot()?;
        Ok(aggregate_month(&snapshot, month))
    }

    /// Month-by-month outlook starting at `start`, `horizon_months` long.
    /// Horizons past `MAX_HORIZON_MONTHS` are rejected.
    pub fn panorama(
        ctx: &RequestContext,
        start: MonthRef,
        horizon_months: u32,
    ) -> Result<Vec<MonthOutlook>> {
        let start = MonthRef::new(start.year, start.month)?;
        if horizon_months > MAX_HORIZON_MONTHS {
            return Err(LedgerError::InvalidInput(format!(
                "horizon: must be at most {MAX_HORIZON_MONTHS} months, got {horizon_months}"
            )));
        }
        let snapshot = ctx.snapshot()?;
        Ok(panorama(&snapshot, start, horizon_months))
    }

    /// Panorama anchored on the clock's current month.
    pub fn panorama_from_today(
        ctx: &RequestContext,
        clock: &dyn Clock,
        horizon_months: u32,
    ) -> Result<Vec<MonthOutlook>> {
        let start = MonthRef::from_date(clock.today());
        Self::panorama(ctx, start, horizon_months)
    }
}
