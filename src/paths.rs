//! Data file locations.
//!
//! `DATA_DIR` overrides the base data directory (default: "data"), which lets
//! several isolated instances run side by side:
//! ```bash
//! DATA_DIR=data/test classroom_srs stats 1
//! ```

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite database holding cards, review logs and sessions
pub fn db_path() -> String {
    format!("{}/reviews.db", data_dir())
}

/// Profiling JSONL output directory
pub fn profile_dir() -> String {
    format!("{}/profiles", data_dir())
}
