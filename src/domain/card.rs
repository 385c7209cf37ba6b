use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
  Flashcard,
  Vocabulary,
}

impl CardType {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "flashcard" | "Flashcard" => Some(Self::Flashcard),
      "vocabulary" | "Vocabulary" => Some(Self::Vocabulary),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Flashcard => "flashcard",
      Self::Vocabulary => "vocabulary",
    }
  }
}

/// Leitner box index, always within `1..=5`.
///
/// Box 1 is reviewed most often, box 5 holds mastered cards. The histogram
/// code relies on exactly five buckets, so a value outside the range can
/// never be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LeitnerBox(u8);

impl LeitnerBox {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;
  /// Number of distinct boxes (histogram width).
  pub const COUNT: usize = 5;

  pub const FIRST: LeitnerBox = LeitnerBox(Self::MIN);
  pub const LAST: LeitnerBox = LeitnerBox(Self::MAX);

  /// Validating constructor for values coming from outside the core.
  pub fn new(value: i64) -> Option<Self> {
    if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
      Some(Self(value as u8))
    } else {
      None
    }
  }

  /// Saturating constructor: anything below 1 becomes 1, above 5 becomes 5.
  pub fn clamped(value: i64) -> Self {
    Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
  }

  pub fn get(self) -> u8 {
    self.0
  }

  /// Zero-based histogram bucket (box 1 -> 0, box 5 -> 4).
  pub fn index(self) -> usize {
    (self.0 - Self::MIN) as usize
  }

  pub fn promote(self) -> Self {
    Self::clamped(self.0 as i64 + 1)
  }

  pub fn demote(self) -> Self {
    Self::clamped(self.0 as i64 - 1)
  }
}

impl Default for LeitnerBox {
  fn default() -> Self {
    Self::FIRST
  }
}

impl TryFrom<u8> for LeitnerBox {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::new(value as i64).ok_or_else(|| format!("box index {} outside 1..=5", value))
  }
}

impl From<LeitnerBox> for u8 {
  fn from(value: LeitnerBox) -> Self {
    value.0
  }
}

impl std::fmt::Display for LeitnerBox {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCard {
  pub id: i64,
  pub student_id: i64,
  pub subject_id: i64,
  pub course_id: Option<i64>,
  pub front: String,
  pub back: String,
  pub card_type: CardType,

  // Scheduling state (denormalized; review_logs keep the history)
  pub box_index: LeitnerBox,
  pub review_count: i64,
  /// None until the first review; a never-reviewed card is due immediately
  pub next_review: Option<DateTime<Utc>>,

  /// Soft-delete flag. Inactive cards are skipped by scheduling and reports.
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

impl ReviewCard {
  pub fn new(
    student_id: i64,
    subject_id: i64,
    front: String,
    back: String,
    card_type: CardType,
  ) -> Self {
    Self {
      id: 0,
      student_id,
      subject_id,
      course_id: None,
      front,
      back,
      card_type,
      box_index: LeitnerBox::FIRST,
      review_count: 0,
      next_review: None,
      is_active: true,
      created_at: Utc::now(),
    }
  }

  /// Start the card in a instructor-chosen box instead of box 1.
  pub fn with_box(mut self, box_index: LeitnerBox) -> Self {
    self.box_index = box_index;
    self
  }

  pub fn with_course(mut self, course_id: i64) -> Self {
    self.course_id = Some(course_id);
    self
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.is_active && self.next_review.map_or(true, |at| at <= now)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn card() -> ReviewCard {
    ReviewCard::new(1, 10, "front".into(), "back".into(), CardType::Flashcard)
  }

  #[test]
  fn test_card_type_from_str() {
    assert_eq!(CardType::from_str("flashcard"), Some(CardType::Flashcard));
    assert_eq!(CardType::from_str("Vocabulary"), Some(CardType::Vocabulary));
    assert_eq!(CardType::from_str("quiz"), None);
    assert_eq!(CardType::from_str(""), None);
  }

  #[test]
  fn test_card_type_as_str_roundtrip() {
    for t in [CardType::Flashcard, CardType::Vocabulary] {
      assert_eq!(CardType::from_str(t.as_str()), Some(t));
    }
  }

  #[test]
  fn test_box_new_rejects_out_of_range() {
    assert_eq!(LeitnerBox::new(0), None);
    assert_eq!(LeitnerBox::new(6), None);
    assert_eq!(LeitnerBox::new(-3), None);
    assert_eq!(LeitnerBox::new(3).map(LeitnerBox::get), Some(3));
  }

  #[test]
  fn test_box_clamped() {
    assert_eq!(LeitnerBox::clamped(-10), LeitnerBox::FIRST);
    assert_eq!(LeitnerBox::clamped(0), LeitnerBox::FIRST);
    assert_eq!(LeitnerBox::clamped(99), LeitnerBox::LAST);
    assert_eq!(LeitnerBox::clamped(4).get(), 4);
  }

  #[test]
  fn test_box_promote_demote_saturate() {
    assert_eq!(LeitnerBox::LAST.promote(), LeitnerBox::LAST);
    assert_eq!(LeitnerBox::FIRST.demote(), LeitnerBox::FIRST);
    assert_eq!(LeitnerBox::FIRST.promote().get(), 2);
    assert_eq!(LeitnerBox::LAST.demote().get(), 4);
  }

  #[test]
  fn test_box_index_is_zero_based() {
    assert_eq!(LeitnerBox::FIRST.index(), 0);
    assert_eq!(LeitnerBox::LAST.index(), LeitnerBox::COUNT - 1);
  }

  #[test]
  fn test_box_serde_rejects_invalid() {
    let ok: LeitnerBox = serde_json::from_str("3").unwrap();
    assert_eq!(ok.get(), 3);
    assert!(serde_json::from_str::<LeitnerBox>("7").is_err());
    assert_eq!(serde_json::to_string(&LeitnerBox::LAST).unwrap(), "5");
  }

  #[test]
  fn test_new_card_defaults() {
    let c = card();
    assert_eq!(c.box_index, LeitnerBox::FIRST);
    assert_eq!(c.review_count, 0);
    assert!(c.next_review.is_none());
    assert!(c.is_active);
    assert!(c.course_id.is_none());
  }

  #[test]
  fn test_never_reviewed_card_is_due() {
    assert!(card().is_due(Utc::now()));
  }

  #[test]
  fn test_future_card_not_due() {
    let now = Utc::now();
    let mut c = card();
    c.next_review = Some(now + Duration::hours(1));
    assert!(!c.is_due(now));
    c.next_review = Some(now);
    assert!(c.is_due(now));
  }

  #[test]
  fn test_inactive_card_never_due() {
    let mut c = card();
    c.is_active = false;
    assert!(!c.is_due(Utc::now()));
  }
}
