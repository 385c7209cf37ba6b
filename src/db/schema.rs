//! Review database schema.
//!
//! Version-gated migrations: each step checks `db_version` before running and
//! records itself afterwards, so `run_migrations` is idempotent.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

/// Current schema version. Increment when adding a migration.
pub const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS db_version (
      version INTEGER PRIMARY KEY,
      applied_at TEXT NOT NULL,
      description TEXT
    );
    "#,
  )?;

  let current_version = get_schema_version(conn)?;
  tracing::debug!("reviews.db schema version: {}", current_version);

  if current_version < 1 {
    migrate_v0_to_v1(conn)?;
  }

  Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<i32> {
  conn.query_row("SELECT COALESCE(MAX(version), 0) FROM db_version", [], |row| row.get(0))
}

/// v0→v1: cards, append-only review log, sessions
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
  tracing::info!("Running migration v0→v1: Create review tables");

  conn.execute_batch(
    r#"
    BEGIN;

    CREATE TABLE IF NOT EXISTS review_cards (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      student_id INTEGER NOT NULL,
      subject_id INTEGER NOT NULL,
      course_id INTEGER,
      front TEXT NOT NULL,
      back TEXT NOT NULL,
      card_type TEXT NOT NULL DEFAULT 'flashcard',
      box_index INTEGER NOT NULL DEFAULT 1 CHECK (box_index BETWEEN 1 AND 5),
      review_count INTEGER NOT NULL DEFAULT 0,
      next_review TEXT,
      is_active INTEGER NOT NULL DEFAULT 1,
      created_at TEXT NOT NULL
    );

    -- Append-only: rows are never updated or deleted
    CREATE TABLE IF NOT EXISTS review_logs (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      card_id INTEGER NOT NULL,
      student_id INTEGER NOT NULL,
      rating TEXT NOT NULL,
      is_correct INTEGER NOT NULL,
      reviewed_at TEXT NOT NULL,
      FOREIGN KEY (card_id) REFERENCES review_cards(id)
    );

    CREATE TABLE IF NOT EXISTS review_sessions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      student_id INTEGER NOT NULL,
      started_at TEXT NOT NULL,
      completed_at TEXT,
      total_cards INTEGER NOT NULL DEFAULT 0,
      correct_cards INTEGER NOT NULL DEFAULT 0,
      xp_earned INTEGER NOT NULL DEFAULT 0,
      CHECK (correct_cards <= total_cards)
    );

    CREATE INDEX IF NOT EXISTS idx_review_cards_student_due ON review_cards(student_id, next_review);
    CREATE INDEX IF NOT EXISTS idx_review_cards_subject ON review_cards(subject_id);
    CREATE INDEX IF NOT EXISTS idx_review_logs_card_id ON review_logs(card_id);
    CREATE INDEX IF NOT EXISTS idx_review_logs_student ON review_logs(student_id, reviewed_at);
    CREATE INDEX IF NOT EXISTS idx_review_sessions_student ON review_sessions(student_id);

    COMMIT;
    "#,
  )?;

  record_version(conn, 1, "Create review tables (cards, logs, sessions)")?;
  Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
  conn.execute(
    "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
    params![version, Utc::now().to_rfc3339(), description],
  )?;
  Ok(())
}
