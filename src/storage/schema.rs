//! Database schema definitions.
//!
//! The `jobs` table mirrors the document shape: a store-assigned integer id
//! plus the natural key and the optional description.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The base SQL schema for the jobsync database.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dep_code TEXT NOT NULL,
    dep_job TEXT NOT NULL,
    description TEXT
);
";

/// Apply pragmas, base schema and pending migrations.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    super::migrations::run_migrations(conn)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}

/// Check that the base schema and every migration are recorded, without
/// changing anything.
///
/// # Errors
///
/// Returns an error if the catalog cannot be queried.
pub fn is_current(conn: &Connection) -> Result<bool> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !tracked {
        return Ok(false);
    }

    let base = format!("v{CURRENT_SCHEMA_VERSION}");
    let mut stmt = conn.prepare("SELECT 1 FROM schema_migrations WHERE version = ?1")?;
    for version in std::iter::once(base.as_str()).chain(super::migrations::versions().map(|v| -> &str { v })) {
        if !stmt.exists([version])? {
            return Ok(false);
        }
    }
    Ok(true)
}
