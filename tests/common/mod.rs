use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use panorama_core::{
    core::RequestContext,
    storage::{JsonStore, MemoryStore, OwnerId},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a context backed by a JSON store in a unique directory, returning
/// the directory so tests can inspect or tamper with the files.
pub fn setup_json_env(owner: &str) -> (RequestContext, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = JsonStore::new(Some(base.clone())).expect("create json store");
    let ctx = RequestContext::new(OwnerId::new(owner), Arc::new(store));
    (ctx, base)
}

/// Creates a context backed by the in-memory store.
pub fn memory_context(owner: &str) -> RequestContext {
    RequestContext::new(OwnerId::new(owner), Arc::new(MemoryStore::new()))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}
