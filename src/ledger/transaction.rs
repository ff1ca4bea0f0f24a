//! Physical transactions: persisted ledger rows for one actual money movement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted ledger row. Installment rows carry their position in the
/// purchase group; membership never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub description: String,
    pub value: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<InstallmentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<Uuid>,
}

impl Transaction {
    /// Creates a standalone (non-installment) transaction.
    pub fn new(
        account_id: Uuid,
        description: impl Into<String>,
        value: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            description: description.into(),
            value,
            date,
            installment: None,
            purchase_id: None,
        }
    }

    pub fn is_installment(&self) -> bool {
        self.installment.is_some()
    }

    /// Presentation label; installment rows are suffixed with their position,
    /// e.g. `Sofa (2/10)`.
    pub fn label(&self) -> String {
        match &self.installment {
            Some(details) => format!("{} ({}/{})", self.description, details.current, details.total),
            None => self.description.clone(),
        }
    }
}

/// Position of one row inside an installment purchase group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallmentDetails {
    /// 1-based index within the group.
    pub current: u32,
    pub total: u32,
}
