//! Review submission and session lifecycle.
//!
//! These functions are the persistence boundary around the pure scheduling
//! core: load state, compute the next state with [`LeitnerPolicy`], and write
//! it back. A review's card update and its log row commit together.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{Connection, ErrorCode, TransactionBehavior};

use crate::db;
use crate::domain::{validate_session_counts, ReviewCard, ReviewLog, ReviewRating, ReviewSession};
use crate::srs::{build_review_queue_with, LeitnerPolicy, ReviewOutcome};

#[derive(Debug)]
pub enum ReviewError {
    CardNotFound(i64),
    /// Card belongs to another student
    NotOwner { card_id: i64, student_id: i64 },
    CardInactive(i64),
    SessionNotFound(i64),
    SessionAlreadyCompleted(i64),
    InvalidCounts { total_cards: i64, correct_cards: i64 },
    Database(rusqlite::Error),
}

impl std::fmt::Display for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewError::CardNotFound(id) => write!(f, "Card {} not found", id),
            ReviewError::NotOwner { card_id, student_id } => {
                write!(f, "Card {} does not belong to student {}", card_id, student_id)
            }
            ReviewError::CardInactive(id) => write!(f, "Card {} is no longer active", id),
            ReviewError::SessionNotFound(id) => write!(f, "Review session {} not found", id),
            ReviewError::SessionAlreadyCompleted(id) => {
                write!(f, "Review session {} is already completed", id)
            }
            ReviewError::InvalidCounts { total_cards, correct_cards } => write!(
                f,
                "Invalid session counts: {} correct out of {}",
                correct_cards, total_cards
            ),
            ReviewError::Database(e) => write!(f, "Failed to save review: {}", e),
        }
    }
}

impl std::error::Error for ReviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReviewError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for ReviewError {
    fn from(e: rusqlite::Error) -> Self {
        ReviewError::Database(e)
    }
}

impl ReviewError {
    /// True for transient storage contention the caller may retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReviewError::Database(rusqlite::Error::SqliteFailure(e, _)) => {
                matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            }
            _ => false,
        }
    }

    /// Returns a user-facing message without storage details.
    pub fn user_message(&self) -> &str {
        match self {
            ReviewError::CardNotFound(_) | ReviewError::NotOwner { .. } => "Card not found",
            ReviewError::CardInactive(_) => "This card has been retired",
            ReviewError::SessionNotFound(_) => "Review session not found",
            ReviewError::SessionAlreadyCompleted(_) => "Review session already finished",
            ReviewError::InvalidCounts { .. } => "Invalid session result",
            ReviewError::Database(_) if self.is_retryable() => "Could not save review, please try again",
            ReviewError::Database(_) => "Could not save review",
        }
    }
}

/// Record one answered card.
///
/// Card update and log append run in a single transaction, so concurrent
/// submissions for the same card never interleave partial writes. Callers must
/// submit each answer once; retrying after a successful commit counts twice.
pub fn submit_review(
    conn: &mut Connection,
    policy: &LeitnerPolicy,
    student_id: i64,
    card_id: i64,
    rating: ReviewRating,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome, ReviewError> {
    // Take the write lock up front so concurrent reviewers wait on busy_timeout
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let card = db::get_card_by_id(&tx, card_id)?.ok_or(ReviewError::CardNotFound(card_id))?;
    if card.student_id != student_id {
        return Err(ReviewError::NotOwner { card_id, student_id });
    }
    if !card.is_active {
        return Err(ReviewError::CardInactive(card_id));
    }

    let outcome = policy.schedule(&card, rating, now);
    db::update_card_schedule(&tx, card_id, outcome.new_box, outcome.review_count, outcome.next_review)?;
    db::insert_review_log(&tx, &ReviewLog::new(card_id, student_id, rating, now))?;
    tx.commit()?;

    tracing::debug!(
        "Card {} reviewed ({}): box {} -> {}, next in {}d",
        card_id,
        rating.as_str(),
        outcome.previous_box,
        outcome.new_box,
        outcome.interval_days
    );

    Ok(outcome)
}

/// A freshly started session and the cards to present, in order.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub session: ReviewSession,
    pub cards: Vec<ReviewCard>,
}

impl SessionPlan {
    /// Nothing due: a valid empty state, not an error
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn start_session<R: Rng + ?Sized>(
    conn: &Connection,
    student_id: i64,
    max_cards: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<SessionPlan, ReviewError> {
    let cards = db::get_active_cards(conn, student_id)?;
    let queue = build_review_queue_with(&cards, max_cards, now, rng);

    let mut session = ReviewSession::new(student_id, now);
    session.id = db::insert_session(conn, &session)?;

    tracing::info!(
        "Started review session {} for student {} with {} cards",
        session.id,
        student_id,
        queue.len()
    );

    Ok(SessionPlan { session, cards: queue })
}

/// Finalize a session; XP is `correct_cards * xp_per_correct`.
pub fn complete_session(
    conn: &Connection,
    session_id: i64,
    total_cards: i64,
    correct_cards: i64,
    xp_per_correct: i64,
    now: DateTime<Utc>,
) -> Result<ReviewSession, ReviewError> {
    if !validate_session_counts(total_cards, correct_cards) {
        return Err(ReviewError::InvalidCounts { total_cards, correct_cards });
    }

    let session = db::get_session_by_id(conn, session_id)?.ok_or(ReviewError::SessionNotFound(session_id))?;
    if session.is_completed() {
        return Err(ReviewError::SessionAlreadyCompleted(session_id));
    }

    let xp_earned = correct_cards
        .checked_mul(xp_per_correct)
        .ok_or(ReviewError::InvalidCounts { total_cards, correct_cards })?;
    if !db::mark_session_completed(conn, session_id, total_cards, correct_cards, xp_earned, now)? {
        // Lost a race with another completion
        return Err(ReviewError::SessionAlreadyCompleted(session_id));
    }

    tracing::info!(
        "Completed review session {}: {}/{} correct, {} XP",
        session_id,
        correct_cards,
        total_cards,
        xp_earned
    );

    Ok(ReviewSession {
        completed_at: Some(now),
        total_cards,
        correct_cards,
        xp_earned,
        ..session
    })
}
