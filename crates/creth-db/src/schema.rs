//! SQL schema definitions.

/// Initial schema: one key/value table holding JSON-encoded preferences.
pub const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
";
