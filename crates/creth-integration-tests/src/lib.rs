//! Integration tests for the crETH client.
//!
//! The library only carries shared fixtures; every scenario lives in
//! `tests/` and drives several workspace crates together.
//!
//! ```sh
//! cargo test -p creth-integration-tests
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use creth_app::{AppContext, ClientConfig};
use creth_db::storage::Storage;
use creth_db::DbError;

/// Every `set` call a [`RecordingStorage`] received, in order.
pub type WriteLog = Arc<Mutex<Vec<(String, String)>>>;

/// In-memory storage that records writes and can refuse some of them.
///
/// `reject_first` names a key whose first write fails with
/// [`DbError::QuotaExceeded`]; later writes to it succeed.
pub struct RecordingStorage {
    values: Vec<(String, String)>,
    writes: WriteLog,
    reject_first: Option<String>,
}

impl RecordingStorage {
    pub fn new() -> (Self, WriteLog) {
        let writes = WriteLog::default();
        let storage = Self {
            values: Vec::new(),
            writes: writes.clone(),
            reject_first: None,
        };
        (storage, writes)
    }

    pub fn rejecting_first_write_to(key: &str) -> (Self, WriteLog) {
        let (mut storage, writes) = Self::new();
        storage.reject_first = Some(key.to_string());
        (storage, writes)
    }
}

impl Storage for RecordingStorage {
    fn get(&self, key: &str) -> creth_db::Result<Option<String>> {
        Ok(self
            .values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> creth_db::Result<()> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_string(), value.to_string()));

        if self.reject_first.as_deref() == Some(key) {
            self.reject_first = None;
            return Err(DbError::QuotaExceeded {
                key: key.to_string(),
                needed: value.len() as u64,
                available: 0,
            });
        }

        self.values.retain(|(k, _)| k != key);
        self.values.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn used_bytes(&self) -> creth_db::Result<u64> {
        Ok(self
            .values
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum())
    }
}

/// Writes recorded so far for `key`, oldest first.
pub fn writes_for(log: &WriteLog, key: &str) -> Vec<String> {
    log.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

/// A signed-in context over an in-memory database.
pub fn signed_in_context() -> AppContext {
    let mut ctx = AppContext::in_memory(ClientConfig::default()).expect("in-memory context");
    ctx.login();
    ctx
}
