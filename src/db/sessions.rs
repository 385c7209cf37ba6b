//! Review session rows

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use super::{parse_db_time, to_db_time};
use crate::domain::ReviewSession;

const SESSION_COLUMNS: &str = "id, student_id, started_at, completed_at, total_cards, correct_cards, xp_earned";

pub fn insert_session(conn: &Connection, session: &ReviewSession) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO review_sessions (student_id, started_at, completed_at, total_cards, correct_cards, xp_earned)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            session.student_id,
            to_db_time(session.started_at),
            session.completed_at.map(to_db_time),
            session.total_cards,
            session.correct_cards,
            session.xp_earned,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_session_by_id(conn: &Connection, id: i64) -> Result<Option<ReviewSession>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM review_sessions WHERE id = ?1", SESSION_COLUMNS))?;

    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_session(row)?))
    } else {
        Ok(None)
    }
}

/// Finalize an open session. Returns false if it was already completed.
pub fn mark_session_completed(
    conn: &Connection,
    id: i64,
    total_cards: i64,
    correct_cards: i64,
    xp_earned: i64,
    completed_at: DateTime<Utc>,
) -> Result<bool> {
    let updated = conn.execute(
        r#"
    UPDATE review_sessions
    SET completed_at = ?1, total_cards = ?2, correct_cards = ?3, xp_earned = ?4
    WHERE id = ?5 AND completed_at IS NULL
    "#,
        params![to_db_time(completed_at), total_cards, correct_cards, xp_earned, id],
    )?;
    Ok(updated > 0)
}

/// Completed sessions for a student, most recent first
pub fn get_completed_sessions(conn: &Connection, student_id: i64) -> Result<Vec<ReviewSession>> {
    let mut stmt = conn.prepare(&format!(
        r#"
    SELECT {} FROM review_sessions
    WHERE student_id = ?1 AND completed_at IS NOT NULL
    ORDER BY completed_at DESC
    "#,
        SESSION_COLUMNS
    ))?;

    let sessions = stmt
        .query_map(params![student_id], row_to_session)?
        .collect::<Result<Vec<_>>>()?;
    Ok(sessions)
}

fn row_to_session(row: &rusqlite::Row) -> Result<ReviewSession> {
    let started_at_str: String = row.get(2)?;
    let completed_at_str: Option<String> = row.get(3)?;

    Ok(ReviewSession {
        id: row.get(0)?,
        student_id: row.get(1)?,
        started_at: parse_db_time(&started_at_str).unwrap_or_else(Utc::now),
        completed_at: completed_at_str.as_deref().and_then(parse_db_time),
        total_cards: row.get(4)?,
        correct_cards: row.get(5)?,
        xp_earned: row.get(6)?,
    })
}
