//! Test utilities for database setup.
//!
//! Reuses the authoritative schema migrations so tests never carry their own
//! copy of the table definitions.

use rusqlite::Connection;
use tempfile::TempDir;

/// Migrated review database in a temporary directory, removed on drop.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("reviews.db"))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }
}
