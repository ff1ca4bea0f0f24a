//! Recurring rules and their on-the-fly expansion into virtual occurrences.
//!
//! Rules are never materialized into stored rows. Every aggregation expands
//! them for the requested month, so deleting a rule instantly removes its
//! effect from every past and future computed balance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::MonthRef;

/// A monthly pattern: the account gains/loses `value` on `day_of_month` of
/// every month from the start month onward. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringRule {
    pub id: Uuid,
    pub account_id: Uuid,
    pub description: String,
    pub value: f64,
    pub day_of_month: u32,
    pub start_date: NaiveDate,
}

impl RecurringRule {
    pub fn new(
        account_id: Uuid,
        description: impl Into<String>,
        value: f64,
        day_of_month: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            description: description.into(),
            value,
            day_of_month,
            start_date,
        }
    }

    /// The start date truncated to its month. The rule is live for the whole
    /// start month, even on days before the literal start date.
    pub fn start_month(&self) -> MonthRef {
        MonthRef::from_date(self.start_date)
    }

    /// Expands the rule for one month.
    ///
    /// Months before the start month yield nothing. Months too short for
    /// `day_of_month` (e.g. day 31 in April) also yield nothing; the day is
    /// never clamped to the month end.
    pub fn occurrence_in(&self, month: MonthRef) -> Option<VirtualOccurrence> {
        if month < self.start_month() {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(month.year, month.month, self.day_of_month)?;
        Some(VirtualOccurrence {
            account_id: self.account_id,
            description: self.description.clone(),
            value: self.value,
            date,
        })
    }
}

/// A rule's computed appearance in one specific month. Never persisted; lives
/// only for the duration of one aggregation call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VirtualOccurrence {
    pub account_id: Uuid,
    pub description: String,
    pub value: f64,
    pub date: NaiveDate,
}
