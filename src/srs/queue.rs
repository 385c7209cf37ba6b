//! Review queue construction.
//!
//! Picks the due cards for the next session. When the backlog is larger than
//! the session, a uniform random subset is drawn instead of the oldest N, so a
//! persistent backlog does not keep surfacing the same cards.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::permutation::{fisher_yates, select_pool_with};
use crate::domain::ReviewCard;
#[cfg(feature = "profiling")]
use crate::profiling::EventType;

/// Build the next session queue using the thread-local random source.
pub fn build_review_queue(cards: &[ReviewCard], max_size: usize, now: DateTime<Utc>) -> Vec<ReviewCard> {
  build_review_queue_with(cards, max_size, now, &mut rand::rng())
}

/// Select up to `max_size` due cards.
///
/// The result is ordered oldest-due first, never-reviewed cards before
/// everything else; cards due at the same instant appear in random order.
/// Not-yet-due cards are never used as padding.
pub fn build_review_queue_with<R: Rng + ?Sized>(
  cards: &[ReviewCard],
  max_size: usize,
  now: DateTime<Utc>,
  rng: &mut R,
) -> Vec<ReviewCard> {
  if max_size == 0 {
    return Vec::new();
  }

  let due: Vec<ReviewCard> = cards.iter().filter(|c| c.is_due(now)).cloned().collect();
  let due_count = due.len();

  let mut queue = if due.len() > max_size {
    select_pool_with(&due, max_size, rng)
  } else {
    let mut all = due;
    fisher_yates(&mut all, rng);
    all
  };

  // Stable sort keeps the random order within equal due times
  queue.sort_by_key(|c| c.next_review);

  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::QueueBuilt {
    due: due_count as i64,
    selected: queue.len() as i64,
  });

  tracing::debug!("Built review queue: {} of {} due cards", queue.len(), due_count);

  queue
}

/// Number of active cards currently due.
pub fn count_due(cards: &[ReviewCard], now: DateTime<Utc>) -> usize {
  cards.iter().filter(|c| c.is_due(now)).count()
}

/// Earliest scheduled review among active cards that are not yet due.
pub fn next_due_at(cards: &[ReviewCard], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
  cards
    .iter()
    .filter(|c| c.is_active)
    .filter_map(|c| c.next_review)
    .filter(|at| *at > now)
    .min()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::CardType;
  use chrono::Duration;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use std::collections::HashSet;

  fn card(id: i64, next_review: Option<DateTime<Utc>>) -> ReviewCard {
    let mut c = ReviewCard::new(1, 1, format!("q{}", id), format!("a{}", id), CardType::Flashcard);
    c.id = id;
    c.next_review = next_review;
    c
  }

  fn ids(cards: &[ReviewCard]) -> Vec<i64> {
    cards.iter().map(|c| c.id).collect()
  }

  #[test]
  fn test_empty_input_empty_queue() {
    let queue = build_review_queue(&[], 10, Utc::now());
    assert!(queue.is_empty());
  }

  #[test]
  fn test_zero_max_size_empty_queue() {
    let now = Utc::now();
    let cards = vec![card(1, None), card(2, None)];
    assert!(build_review_queue(&cards, 0, now).is_empty());
  }

  #[test]
  fn test_only_due_cards_selected() {
    let now = Utc::now();
    let cards = vec![
      card(1, Some(now - Duration::hours(2))),
      card(2, Some(now + Duration::hours(2))),
      card(3, None),
      card(4, Some(now)),
    ];
    let queue = build_review_queue(&cards, 10, now);
    let got: HashSet<i64> = ids(&queue).into_iter().collect();
    assert_eq!(got, HashSet::from([1, 3, 4]));
  }

  #[test]
  fn test_no_padding_with_future_cards() {
    let now = Utc::now();
    let cards = vec![card(1, None), card(2, Some(now + Duration::days(1)))];
    let queue = build_review_queue(&cards, 5, now);
    assert_eq!(ids(&queue), vec![1]);
  }

  #[test]
  fn test_inactive_cards_excluded() {
    let now = Utc::now();
    let mut inactive = card(1, None);
    inactive.is_active = false;
    let cards = vec![inactive, card(2, None)];
    assert_eq!(ids(&build_review_queue(&cards, 5, now)), vec![2]);
  }

  #[test]
  fn test_ordered_oldest_first() {
    let now = Utc::now();
    let cards = vec![
      card(1, Some(now - Duration::hours(1))),
      card(2, Some(now - Duration::days(3))),
      card(3, None),
      card(4, Some(now - Duration::days(1))),
    ];
    let queue = build_review_queue(&cards, 10, now);
    assert_eq!(ids(&queue), vec![3, 2, 4, 1]);
  }

  #[test]
  fn test_capped_to_max_size() {
    let now = Utc::now();
    let cards: Vec<ReviewCard> = (1..=30).map(|id| card(id, None)).collect();
    let queue = build_review_queue(&cards, 8, now);
    assert_eq!(queue.len(), 8);
    let unique: HashSet<i64> = ids(&queue).into_iter().collect();
    assert_eq!(unique.len(), 8);
  }

  #[test]
  fn test_backlog_sampling_is_not_oldest_first() {
    // With a backlog, later-due cards must still get picked sometimes
    let now = Utc::now();
    let cards: Vec<ReviewCard> = (1..=20)
      .map(|id| card(id, Some(now - Duration::days(30 - id))))
      .collect();
    let mut rng = StdRng::seed_from_u64(11);
    let mut seen = HashSet::new();
    for _ in 0..40 {
      for c in build_review_queue_with(&cards, 5, now, &mut rng) {
        seen.insert(c.id);
      }
    }
    assert!(seen.iter().any(|id| *id > 5));
  }

  #[test]
  fn test_ties_are_randomized() {
    let now = Utc::now();
    let due_at = Some(now - Duration::hours(1));
    let cards: Vec<ReviewCard> = (1..=5).map(|id| card(id, due_at)).collect();
    let mut rng = StdRng::seed_from_u64(5);
    let orders: HashSet<Vec<i64>> = (0..30)
      .map(|_| ids(&build_review_queue_with(&cards, 5, now, &mut rng)))
      .collect();
    assert!(orders.len() > 1);
  }

  #[test]
  fn test_count_due_and_next_due() {
    let now = Utc::now();
    let soon = now + Duration::hours(3);
    let later = now + Duration::days(2);
    let cards = vec![card(1, None), card(2, Some(soon)), card(3, Some(later))];
    assert_eq!(count_due(&cards, now), 1);
    assert_eq!(next_due_at(&cards, now), Some(soon));
  }

  #[test]
  fn test_next_due_none_when_all_due() {
    let now = Utc::now();
    let cards = vec![card(1, None), card(2, Some(now - Duration::minutes(1)))];
    assert_eq!(next_due_at(&cards, now), None);
  }
}
