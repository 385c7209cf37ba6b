pub mod cards;
pub mod reviews;
pub mod schema;
pub mod sessions;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// Re-export all public items from submodules
pub use cards::*;
pub use reviews::*;
pub use schema::run_migrations;
pub use sessions::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Database unavailable")
    }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
    pool.lock().map_err(|_: PoisonError<_>| {
        tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
        DbLockError
    })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).log_warn("Could not create database directory");
    }

    // Create backup before migrations if database exists
    if path.exists() {
        let backup_path = path.with_extension("db.backup");
        std::fs::copy(path, &backup_path).log_warn("Could not create database backup");
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Fixed-width UTC timestamps so text comparison in SQL matches time order
pub(crate) fn to_db_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_db_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_db_time_roundtrip_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(1500);
        assert_eq!(to_db_time(a).len(), to_db_time(b).len());
        assert!(to_db_time(a) < to_db_time(b));
        assert_eq!(parse_db_time(&to_db_time(b)), Some(b));
    }

    #[test]
    fn test_parse_db_time_invalid() {
        assert_eq!(parse_db_time("yesterday"), None);
    }

    #[test]
    fn test_log_warn_default() {
        let failed: std::result::Result<i32, String> = Err("boom".into());
        assert_eq!(failed.log_warn_default("test"), 0);
        let ok: std::result::Result<i32, String> = Ok(4);
        assert_eq!(ok.log_warn("test"), Some(4));
    }

    #[test]
    fn test_init_db_creates_file_and_backup() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nested/reviews.db");

        let pool = init_db(&path).unwrap();
        drop(pool);
        assert!(path.exists());

        let pool = init_db(&path).unwrap();
        assert!(path.with_extension("db.backup").exists());
        assert!(try_lock(&pool).is_ok());
    }
}
