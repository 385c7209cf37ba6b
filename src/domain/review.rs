use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Student's self-assessment of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewRating {
  Again, // Wrong answer
  Hard,  // Right, but struggled
  Good,
  Easy,
}

impl ReviewRating {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "again" => Some(Self::Again),
      "hard" => Some(Self::Hard),
      "good" => Some(Self::Good),
      "easy" => Some(Self::Easy),
      _ => None,
    }
  }

  /// Only `Again` counts as an incorrect answer
  pub fn is_correct(&self) -> bool {
    !matches!(self, Self::Again)
  }

  /// Ratings that feed struggled-card detection
  pub fn is_struggle(&self) -> bool {
    matches!(self, Self::Again | Self::Hard)
  }
}

/// Append-only audit record of one review attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLog {
  pub id: i64,
  pub card_id: i64,
  pub student_id: i64,
  pub rating: ReviewRating,
  pub reviewed_at: DateTime<Utc>,
}

impl ReviewLog {
  pub fn new(card_id: i64, student_id: i64, rating: ReviewRating, reviewed_at: DateTime<Utc>) -> Self {
    Self {
      id: 0,
      card_id,
      student_id,
      rating,
      reviewed_at,
    }
  }

  pub fn is_correct(&self) -> bool {
    self.rating.is_correct()
  }
}
