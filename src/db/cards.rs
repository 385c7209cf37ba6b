//! Review card CRUD and query operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use super::{parse_db_time, to_db_time};
use crate::domain::{CardType, LeitnerBox, ReviewCard};
#[cfg(feature = "profiling")]
use crate::profiling::EventType;

const CARD_COLUMNS: &str = "id, student_id, subject_id, course_id, front, back, card_type, box_index, \
                            review_count, next_review, is_active, created_at";

pub fn insert_card(conn: &Connection, card: &ReviewCard) -> Result<i64> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::DbQuery {
        operation: "insert".into(),
        table: "review_cards".into(),
    });

    conn.execute(
        r#"
    INSERT INTO review_cards (student_id, subject_id, course_id, front, back, card_type, box_index,
                              review_count, next_review, is_active, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
        params![
            card.student_id,
            card.subject_id,
            card.course_id,
            card.front,
            card.back,
            card.card_type.as_str(),
            card.box_index.get(),
            card.review_count,
            card.next_review.map(to_db_time),
            card.is_active,
            to_db_time(card.created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_card_by_id(conn: &Connection, id: i64) -> Result<Option<ReviewCard>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM review_cards WHERE id = ?1", CARD_COLUMNS))?;

    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_card(row)?))
    } else {
        Ok(None)
    }
}

/// All active cards owned by a student
pub fn get_active_cards(conn: &Connection, student_id: i64) -> Result<Vec<ReviewCard>> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::DbQuery {
        operation: "select".into(),
        table: "review_cards".into(),
    });

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM review_cards WHERE student_id = ?1 AND is_active = 1 ORDER BY id",
        CARD_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![student_id], row_to_card)?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

/// Active cards of every student for one subject (class-level reports)
pub fn get_subject_cards(conn: &Connection, subject_id: i64) -> Result<Vec<ReviewCard>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM review_cards WHERE subject_id = ?1 AND is_active = 1 ORDER BY id",
        CARD_COLUMNS
    ))?;

    let cards = stmt
        .query_map(params![subject_id], row_to_card)?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

/// Number of a student's active cards due at `now`
pub fn get_due_count(conn: &Connection, student_id: i64, now: DateTime<Utc>) -> Result<i64> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::DbQuery {
        operation: "count".into(),
        table: "review_cards".into(),
    });

    conn.query_row(
        r#"
    SELECT COUNT(*) FROM review_cards
    WHERE student_id = ?1 AND is_active = 1
      AND (next_review IS NULL OR next_review <= ?2)
    "#,
        params![student_id, to_db_time(now)],
        |row| row.get(0),
    )
}

/// Persist the scheduler's computed state for one card
pub fn update_card_schedule(
    conn: &Connection,
    card_id: i64,
    box_index: LeitnerBox,
    review_count: i64,
    next_review: DateTime<Utc>,
) -> Result<usize> {
    conn.execute(
        r#"
    UPDATE review_cards
    SET box_index = ?1, review_count = ?2, next_review = ?3
    WHERE id = ?4
    "#,
        params![box_index.get(), review_count, to_db_time(next_review), card_id],
    )
}

/// Soft delete: history stays in place for analytics.
/// Returns false when the card does not exist or was already inactive.
pub fn deactivate_card(conn: &Connection, card_id: i64) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE review_cards SET is_active = 0 WHERE id = ?1 AND is_active = 1",
        params![card_id],
    )?;
    Ok(updated > 0)
}

pub(crate) fn row_to_card(row: &rusqlite::Row) -> Result<ReviewCard> {
    let card_type_str: String = row.get(6)?;
    let box_index: i64 = row.get(7)?;
    let next_review_str: Option<String> = row.get(9)?;
    let is_active_int: i64 = row.get(10)?;
    let created_at_str: String = row.get(11)?;

    Ok(ReviewCard {
        id: row.get(0)?,
        student_id: row.get(1)?,
        subject_id: row.get(2)?,
        course_id: row.get(3)?,
        front: row.get(4)?,
        back: row.get(5)?,
        card_type: CardType::from_str(&card_type_str).unwrap_or(CardType::Flashcard),
        box_index: LeitnerBox::clamped(box_index),
        review_count: row.get(8)?,
        next_review: next_review_str.as_deref().and_then(parse_db_time),
        is_active: is_active_int != 0,
        created_at: parse_db_time(&created_at_str).unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;
    use chrono::Duration;

    fn new_card(student_id: i64, subject_id: i64) -> ReviewCard {
        ReviewCard::new(student_id, subject_id, "photosynthesis".into(), "light to sugar".into(), CardType::Flashcard)
    }

    #[test]
    fn test_insert_and_get_card() {
        let env = TestEnv::new().unwrap();
        let card = new_card(1, 10).with_box(LeitnerBox::clamped(3)).with_course(77);
        let id = insert_card(&env.conn, &card).unwrap();

        let loaded = get_card_by_id(&env.conn, id).unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.student_id, 1);
        assert_eq!(loaded.subject_id, 10);
        assert_eq!(loaded.course_id, Some(77));
        assert_eq!(loaded.box_index.get(), 3);
        assert_eq!(loaded.card_type, CardType::Flashcard);
        assert!(loaded.next_review.is_none());
        assert!(loaded.is_active);
    }

    #[test]
    fn test_get_missing_card() {
        let env = TestEnv::new().unwrap();
        assert!(get_card_by_id(&env.conn, 404).unwrap().is_none());
    }

    #[test]
    fn test_active_cards_scoped_to_student() {
        let env = TestEnv::new().unwrap();
        insert_card(&env.conn, &new_card(1, 10)).unwrap();
        insert_card(&env.conn, &new_card(1, 11)).unwrap();
        insert_card(&env.conn, &new_card(2, 10)).unwrap();

        assert_eq!(get_active_cards(&env.conn, 1).unwrap().len(), 2);
        assert_eq!(get_active_cards(&env.conn, 2).unwrap().len(), 1);
        assert_eq!(get_subject_cards(&env.conn, 10).unwrap().len(), 2);
    }

    #[test]
    fn test_deactivate_card() {
        let env = TestEnv::new().unwrap();
        let id = insert_card(&env.conn, &new_card(1, 10)).unwrap();

        assert!(deactivate_card(&env.conn, id).unwrap());
        assert!(!deactivate_card(&env.conn, id).unwrap());
        assert!(get_active_cards(&env.conn, 1).unwrap().is_empty());

        // Row survives for analytics
        let card = get_card_by_id(&env.conn, id).unwrap().unwrap();
        assert!(!card.is_active);
    }

    #[test]
    fn test_update_schedule_and_due_count() {
        let env = TestEnv::new().unwrap();
        let now = Utc::now();
        let a = insert_card(&env.conn, &new_card(1, 10)).unwrap();
        insert_card(&env.conn, &new_card(1, 10)).unwrap();

        assert_eq!(get_due_count(&env.conn, 1, now).unwrap(), 2);

        let later = now + Duration::days(2);
        update_card_schedule(&env.conn, a, LeitnerBox::clamped(2), 1, later).unwrap();
        assert_eq!(get_due_count(&env.conn, 1, now).unwrap(), 1);
        assert_eq!(get_due_count(&env.conn, 1, later).unwrap(), 2);

        let card = get_card_by_id(&env.conn, a).unwrap().unwrap();
        assert_eq!(card.box_index.get(), 2);
        assert_eq!(card.review_count, 1);
        assert_eq!(card.next_review.map(|t| t.timestamp_micros()), Some(later.timestamp_micros()));
    }
}
