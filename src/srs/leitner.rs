use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::DEFAULT_BOX_INTERVALS_DAYS;
use crate::domain::{LeitnerBox, ReviewCard, ReviewRating};
#[cfg(feature = "profiling")]
use crate::profiling::EventType;

/// Box transition rule plus per-box review intervals.
///
/// | rating | new box                  |
/// |--------|--------------------------|
/// | Again  | reset to box 1           |
/// | Hard   | one box down (floor 1)   |
/// | Good   | one box up (cap 5)       |
/// | Easy   | one box up (cap 5)       |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeitnerPolicy {
  /// Days until the next review, indexed by resulting box (box 1 first)
  pub intervals_days: [i64; LeitnerBox::COUNT],
}

impl Default for LeitnerPolicy {
  fn default() -> Self {
    Self {
      intervals_days: DEFAULT_BOX_INTERVALS_DAYS,
    }
  }
}

/// Next scheduling state computed for one review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
  pub card_id: i64,
  pub rating: ReviewRating,
  pub previous_box: LeitnerBox,
  pub new_box: LeitnerBox,
  pub interval_days: i64,
  pub next_review: DateTime<Utc>,
  pub review_count: i64,
}

impl ReviewOutcome {
  pub fn is_correct(&self) -> bool {
    self.rating.is_correct()
  }

  /// Write the computed state onto the in-memory card.
  pub fn apply_to(&self, card: &mut ReviewCard) {
    card.box_index = self.new_box;
    card.next_review = Some(self.next_review);
    card.review_count = self.review_count;
  }
}

impl LeitnerPolicy {
  pub fn new(intervals_days: [i64; LeitnerBox::COUNT]) -> Self {
    Self { intervals_days }
  }

  pub fn transition(&self, current: LeitnerBox, rating: ReviewRating) -> LeitnerBox {
    match rating {
      ReviewRating::Again => LeitnerBox::FIRST,
      ReviewRating::Hard => current.demote(),
      ReviewRating::Good | ReviewRating::Easy => current.promote(),
    }
  }

  pub fn interval_days(&self, box_index: LeitnerBox) -> i64 {
    self.intervals_days[box_index.index()]
  }

  /// Compute the card's next state. Call exactly once per submitted review:
  /// the returned review count is the card's count plus one.
  pub fn schedule(&self, card: &ReviewCard, rating: ReviewRating, now: DateTime<Utc>) -> ReviewOutcome {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::SrsCalculation {
      algorithm: "leitner".into(),
      card_id: card.id,
      rating: rating.as_str().into(),
    });

    let new_box = self.transition(card.box_index, rating);
    let interval_days = self.interval_days(new_box);

    ReviewOutcome {
      card_id: card.id,
      rating,
      previous_box: card.box_index,
      new_box,
      interval_days,
      next_review: now + Duration::days(interval_days),
      review_count: card.review_count + 1,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::CardType;

  const ALL_RATINGS: [ReviewRating; 4] = [
    ReviewRating::Again,
    ReviewRating::Hard,
    ReviewRating::Good,
    ReviewRating::Easy,
  ];

  fn card_in_box(b: u8) -> ReviewCard {
    ReviewCard::new(1, 1, "q".into(), "a".into(), CardType::Flashcard)
      .with_box(LeitnerBox::clamped(b as i64))
  }

  #[test]
  fn test_good_promotes_one_box() {
    let policy = LeitnerPolicy::default();
    let out = policy.schedule(&card_in_box(2), ReviewRating::Good, Utc::now());
    assert_eq!(out.previous_box.get(), 2);
    assert_eq!(out.new_box.get(), 3);
  }

  #[test]
  fn test_easy_promotes_one_box() {
    let policy = LeitnerPolicy::default();
    assert_eq!(policy.transition(LeitnerBox::FIRST, ReviewRating::Easy).get(), 2);
  }

  #[test]
  fn test_again_resets_to_first_box() {
    let policy = LeitnerPolicy::default();
    for b in 1..=5 {
      let out = policy.schedule(&card_in_box(b), ReviewRating::Again, Utc::now());
      assert_eq!(out.new_box, LeitnerBox::FIRST);
    }
  }

  #[test]
  fn test_mastered_card_failure_drops_to_box_one() {
    let policy = LeitnerPolicy::default();
    let out = policy.schedule(&card_in_box(5), ReviewRating::Again, Utc::now());
    assert_eq!(out.new_box.get(), 1);
    assert!(!out.is_correct());
  }

  #[test]
  fn test_hard_demotes_one_box() {
    let policy = LeitnerPolicy::default();
    assert_eq!(policy.transition(LeitnerBox::clamped(4), ReviewRating::Hard).get(), 3);
    assert_eq!(policy.transition(LeitnerBox::FIRST, ReviewRating::Hard), LeitnerBox::FIRST);
  }

  #[test]
  fn test_top_box_stays_on_promotion() {
    let policy = LeitnerPolicy::default();
    assert_eq!(policy.transition(LeitnerBox::LAST, ReviewRating::Good), LeitnerBox::LAST);
  }

  #[test]
  fn test_box_never_leaves_range() {
    let policy = LeitnerPolicy::default();
    for start in 1..=5 {
      for rating in ALL_RATINGS {
        let mut card = card_in_box(start);
        for _ in 0..20 {
          let out = policy.schedule(&card, rating, Utc::now());
          out.apply_to(&mut card);
          let b = card.box_index.get();
          assert!((1..=5).contains(&b));
        }
      }
    }
  }

  #[test]
  fn test_mixed_sequence_stays_in_range() {
    let policy = LeitnerPolicy::default();
    let mut card = card_in_box(1);
    let pattern = [
      ReviewRating::Good,
      ReviewRating::Easy,
      ReviewRating::Hard,
      ReviewRating::Good,
      ReviewRating::Good,
      ReviewRating::Good,
      ReviewRating::Good,
      ReviewRating::Again,
      ReviewRating::Hard,
    ];
    for rating in pattern.iter().cycle().take(90) {
      policy.schedule(&card, *rating, Utc::now()).apply_to(&mut card);
      assert!(card.box_index >= LeitnerBox::FIRST && card.box_index <= LeitnerBox::LAST);
    }
    assert_eq!(card.review_count, 90);
  }

  #[test]
  fn test_review_count_increments_once() {
    let policy = LeitnerPolicy::default();
    let mut card = card_in_box(1);
    card.review_count = 7;
    let out = policy.schedule(&card, ReviewRating::Hard, Utc::now());
    assert_eq!(out.review_count, 8);
  }

  #[test]
  fn test_next_review_uses_resulting_box_interval() {
    let policy = LeitnerPolicy::new([1, 3, 5, 10, 30]);
    let now = Utc::now();
    let out = policy.schedule(&card_in_box(3), ReviewRating::Good, now);
    assert_eq!(out.interval_days, 10);
    assert_eq!(out.next_review, now + Duration::days(10));
  }

  #[test]
  fn test_higher_box_waits_longer() {
    let policy = LeitnerPolicy::default();
    let intervals: Vec<i64> = (1..=5)
      .map(|b| policy.interval_days(LeitnerBox::clamped(b)))
      .collect();
    assert!(intervals.windows(2).all(|w| w[0] < w[1]));
  }

  #[test]
  fn test_apply_to_sets_next_review() {
    let policy = LeitnerPolicy::default();
    let mut card = card_in_box(1);
    assert!(card.next_review.is_none());
    let out = policy.schedule(&card, ReviewRating::Good, Utc::now());
    out.apply_to(&mut card);
    assert_eq!(card.next_review, Some(out.next_review));
    assert_eq!(card.box_index.get(), 2);
  }
}
