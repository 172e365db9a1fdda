//! Key/value storage backends.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::{DbError, Result};

/// Browser local storage budget: 5 MiB.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// A string key/value store with a bounded capacity.
///
/// Implementations must report [`DbError::QuotaExceeded`] when a write does
/// not fit, leaving the previous value for that key in place.
pub trait Storage: Send {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Bytes currently in use, counting keys and values.
    fn used_bytes(&self) -> Result<u64>;
}

/// SQLite-backed storage enforcing a byte quota.
pub struct SqliteStorage {
    conn: Connection,
    quota_bytes: u64,
}

impl SqliteStorage {
    /// Open (or create) a file-backed store.
    pub fn open(path: &Path, quota_bytes: u64) -> Result<Self> {
        Ok(Self {
            conn: crate::open(path)?,
            quota_bytes,
        })
    }

    /// Open an in-memory store.
    pub fn open_memory(quota_bytes: u64) -> Result<Self> {
        Ok(Self {
            conn: crate::open_memory()?,
            quota_bytes,
        })
    }

    pub fn quota_bytes(&self) -> u64 {
        self.quota_bytes
    }

    /// Bytes used by every entry except `key`.
    fn used_excluding(&self, key: &str) -> Result<u64> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0)
             FROM preferences WHERE key != ?1",
            [key],
            |row| row.get(0),
        )?;
        Ok(used as u64)
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let needed = (key.len() + value.len()) as u64;
        let used = self.used_excluding(key)?;
        if used + needed > self.quota_bytes {
            return Err(DbError::QuotaExceeded {
                key: key.to_string(),
                needed,
                available: self.quota_bytes.saturating_sub(used),
            });
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, creth_types::now_millis() as i64],
        )?;
        Ok(())
    }

    fn used_bytes(&self) -> Result<u64> {
        self.used_excluding("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut storage = SqliteStorage::open_memory(DEFAULT_QUOTA_BYTES).expect("open");
        storage.set("theme", "\"dark\"").expect("set");
        assert_eq!(storage.get("theme").expect("get").as_deref(), Some("\"dark\""));
    }

    #[test]
    fn test_get_missing() {
        let storage = SqliteStorage::open_memory(DEFAULT_QUOTA_BYTES).expect("open");
        assert_eq!(storage.get("nonexistent").expect("get"), None);
    }

    #[test]
    fn test_used_bytes_counts_keys_and_values() {
        let mut storage = SqliteStorage::open_memory(DEFAULT_QUOTA_BYTES).expect("open");
        storage.set("ab", "1234").expect("set");
        storage.set("c", "56").expect("set");
        assert_eq!(storage.used_bytes().expect("used"), 9);
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_value() {
        let mut storage = SqliteStorage::open_memory(16).expect("open");
        storage.set("k", "small").expect("set");

        let result = storage.set("k", &"x".repeat(32));
        match result {
            Err(DbError::QuotaExceeded { key, needed, available }) => {
                assert_eq!(key, "k");
                assert_eq!(needed, 33);
                assert_eq!(available, 16);
            }
            other => panic!("expected quota error, got {other:?}"),
        }
        assert_eq!(storage.get("k").expect("get").as_deref(), Some("small"));
    }

    #[test]
    fn test_replacing_a_key_reuses_its_space() {
        let mut storage = SqliteStorage::open_memory(12).expect("open");
        storage.set("k", "0123456789").expect("first");
        // A same-size overwrite must fit even though the store is nearly full.
        storage.set("k", "9876543210").expect("overwrite");
        assert_eq!(storage.used_bytes().expect("used"), 11);
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("creth-db-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("prefs.db");
        {
            let mut storage = SqliteStorage::open(&path, DEFAULT_QUOTA_BYTES).expect("open");
            storage.set("theme", "\"light\"").expect("set");
        }
        let storage = SqliteStorage::open(&path, DEFAULT_QUOTA_BYTES).expect("reopen");
        assert_eq!(storage.get("theme").expect("get").as_deref(), Some("\"light\""));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
