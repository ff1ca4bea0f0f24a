use std::sync::Arc;

use crate::{
    errors::Result,
    ledger::LedgerSnapshot,
    storage::{LedgerStore, OwnerId},
};

/// Everything a service call needs: whose ledger, and where it lives.
///
/// Cheap to clone; handlers typically build one per request from the
/// authenticated owner and a shared store.
#[derive(Clone)]
pub struct RequestContext {
    pub owner: OwnerId,
    pub store: Arc<dyn LedgerStore>,
}

impl RequestContext {
    pub fn new(owner: OwnerId, store: Arc<dyn LedgerStore>) -> Self {
        Self { owner, store }
    }

    /// Reads the owner's full ledger in one pass.
    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        self.store.snapshot(&self.owner)
    }
}
