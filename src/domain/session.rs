use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sitting of review cards for a student.
///
/// `completed_at` stays `None` until the session is finished; unfinished
/// sessions are excluded from every aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSession {
  pub id: i64,
  pub student_id: i64,
  pub started_at: DateTime<Utc>,
  pub completed_at: Option<DateTime<Utc>>,
  pub total_cards: i64,
  pub correct_cards: i64,
  pub xp_earned: i64,
}

impl ReviewSession {
  pub fn new(student_id: i64, started_at: DateTime<Utc>) -> Self {
    Self {
      id: 0,
      student_id,
      started_at,
      completed_at: None,
      total_cards: 0,
      correct_cards: 0,
      xp_earned: 0,
    }
  }

  pub fn is_completed(&self) -> bool {
    self.completed_at.is_some()
  }

  /// Fraction of presented cards answered correctly (0.0 when empty)
  pub fn accuracy(&self) -> f64 {
    if self.total_cards > 0 {
      self.correct_cards as f64 / self.total_cards as f64
    } else {
      0.0
    }
  }
}

/// Counts checked before a session is finalized.
pub fn validate_session_counts(total_cards: i64, correct_cards: i64) -> bool {
  total_cards >= 0 && correct_cards >= 0 && correct_cards <= total_cards
}
