use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for ledger, service, and storage layers.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A request field failed validation before any computation or write.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Recurring rule not found: {0}")]
    RuleNotFound(Uuid),
    /// An atomic write batch failed; no partial rows were persisted.
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
