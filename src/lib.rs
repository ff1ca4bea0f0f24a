#![doc(test(attr(deny(warnings))))]

//! Panorama Core tracks money movement across accounts and projects
//! balances forward by replaying stored transactions together with virtual
//! occurrences of recurring rules.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Panorama Core tracing initialized.");
    });
}
