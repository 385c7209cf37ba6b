//! Append-only review log

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use super::{parse_db_time, to_db_time};
use crate::domain::{ReviewLog, ReviewRating};
#[cfg(feature = "profiling")]
use crate::profiling::EventType;

pub fn insert_review_log(conn: &Connection, log: &ReviewLog) -> Result<i64> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::DbQuery {
        operation: "insert".into(),
        table: "review_logs".into(),
    });

    conn.execute(
        r#"
    INSERT INTO review_logs (card_id, student_id, rating, is_correct, reviewed_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
        params![
            log.card_id,
            log.student_id,
            log.rating.as_str(),
            log.is_correct(),
            to_db_time(log.reviewed_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Logs for one student, oldest first, optionally limited to `since`
pub fn get_student_logs(
    conn: &Connection,
    student_id: i64,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<ReviewLog>> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::DbQuery {
        operation: "select".into(),
        table: "review_logs".into(),
    });

    let mut stmt = conn.prepare(
        r#"
    SELECT id, card_id, student_id, rating, reviewed_at
    FROM review_logs
    WHERE student_id = ?1 AND (?2 IS NULL OR reviewed_at >= ?2)
    ORDER BY reviewed_at ASC, id ASC
    "#,
    )?;

    let logs = stmt
        .query_map(params![student_id, since.map(to_db_time)], row_to_log)?
        .filter_map(|r| r.transpose())
        .collect::<Result<Vec<_>>>()?;
    Ok(logs)
}

pub fn get_card_logs(conn: &Connection, card_id: i64) -> Result<Vec<ReviewLog>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, card_id, student_id, rating, reviewed_at
    FROM review_logs
    WHERE card_id = ?1
    ORDER BY reviewed_at ASC, id ASC
    "#,
    )?;

    let logs = stmt
        .query_map(params![card_id], row_to_log)?
        .filter_map(|r| r.transpose())
        .collect::<Result<Vec<_>>>()?;
    Ok(logs)
}

/// Rows with an unknown rating string are skipped rather than failing the query.
fn row_to_log(row: &rusqlite::Row) -> Result<Option<ReviewLog>> {
    let rating_str: String = row.get(3)?;
    let reviewed_at_str: String = row.get(4)?;

    let Some(rating) = ReviewRating::from_str(&rating_str) else {
        tracing::warn!("Skipping review log with unknown rating '{}'", rating_str);
        return Ok(None);
    };

    Ok(Some(ReviewLog {
        id: row.get(0)?,
        card_id: row.get(1)?,
        student_id: row.get(2)?,
        rating,
        reviewed_at: parse_db_time(&reviewed_at_str).unwrap_or_else(Utc::now),
    }))
}
