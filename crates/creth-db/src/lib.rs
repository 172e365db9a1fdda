//! # creth-db
//!
//! Local persistence for the crETH client.
//!
//! The client keeps its preferences in a small key/value store that mirrors
//! browser local storage: JSON values under short string keys, with a hard
//! byte quota. [`storage::SqliteStorage`] is the default backend; the
//! [`preferences::PreferenceStore`] on top of it degrades gracefully when the
//! quota is hit.
//!
//! File-backed databases run in WAL mode. The schema version lives in
//! `PRAGMA user_version`.

pub mod migrations;
pub mod preferences;
pub mod schema;
pub mod storage;

use std::path::Path;

use rusqlite::Connection;

/// Schema version this client writes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("storage quota exceeded writing '{key}': need {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: u64,
        available: u64,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open the preference database at `path`, creating and migrating it.
pub fn open(path: &Path) -> Result<Connection> {
    prepare(Connection::open(path)?)
}

/// Open a throwaway in-memory preference database.
pub fn open_memory() -> Result<Connection> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection> {
    // In-memory databases answer "memory" here.
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    migrations::run(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_database_is_migrated() {
        let conn = open_memory().expect("open");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("user_version");
        assert_eq!(version, SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'preferences'",
                [],
                |row| row.get(0),
            )
            .expect("sqlite_master");
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_file_database_uses_wal() {
        let dir = std::env::temp_dir().join(format!("creth-db-wal-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let conn = open(&dir.join("wal.db")).expect("open");
        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("journal_mode");
        assert_eq!(mode, "wal");
        drop(conn);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
