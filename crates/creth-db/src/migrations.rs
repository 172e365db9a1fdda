//! Forward-only schema migrations.
//!
//! Step `n` of [`STEPS`] upgrades the schema from version `n` to `n + 1`.
//! Each step and its `user_version` bump commit together.

use rusqlite::Connection;
use tracing::info;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

const STEPS: &[&str] = &[schema::SCHEMA_V1];

/// Bring the database up to [`SCHEMA_VERSION`].
pub fn run(conn: &Connection) -> Result<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if current > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "preference database is at v{current}, this client supports up to v{SCHEMA_VERSION}"
        )));
    }

    for (index, sql) in STEPS.iter().enumerate().skip(current as usize) {
        let version = index as u32 + 1;
        info!(from = version - 1, to = version, "migrating preference database");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(conn: &Connection) -> u32 {
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("version")
    }

    #[test]
    fn test_steps_match_schema_version() {
        assert_eq!(STEPS.len() as u32, SCHEMA_VERSION);
    }

    #[test]
    fn test_run_is_idempotent() {
        let conn = Connection::open_in_memory().expect("open");
        run(&conn).expect("first run");
        run(&conn).expect("second run");
        assert_eq!(version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_version_rejected() {
        let conn = Connection::open_in_memory().expect("open");
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .expect("bump");
        assert!(matches!(run(&conn), Err(DbError::Migration(_))));
        assert_eq!(version(&conn), SCHEMA_VERSION + 1);
    }
}
