//! Read-only reporting over cards, review logs and sessions.
//!
//! All functions are pure: the same input always gives the same output.
//! Inactive cards and unfinished sessions never contribute.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::config::DEFAULT_MASTERY_BOX;
use crate::domain::{LeitnerBox, ReviewCard, ReviewLog, ReviewSession};

/// Count of active cards per box; bucket 0 is box 1, bucket 4 is box 5.
pub fn compute_card_distribution(cards: &[ReviewCard]) -> [usize; LeitnerBox::COUNT] {
  let mut buckets = [0usize; LeitnerBox::COUNT];
  for card in cards.iter().filter(|c| c.is_active) {
    buckets[card.box_index.index()] += 1;
  }
  buckets
}

/// Mastery of one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectMastery {
  pub mastered: usize,
  pub total: usize,
}

impl SubjectMastery {
  /// Unrounded fraction in `0.0..=1.0`. `total` is never zero for entries
  /// produced by [`compute_subject_mastery`].
  pub fn ratio(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      self.mastered as f64 / self.total as f64
    }
  }

  pub fn percentage(&self) -> f64 {
    self.ratio() * 100.0
  }

  /// Percentage rounded to the nearest whole number for display
  pub fn rounded_percentage(&self) -> u32 {
    self.percentage().round() as u32
  }
}

/// Per-subject mastery using the default threshold (box 4 and above).
pub fn compute_subject_mastery(cards: &[ReviewCard]) -> BTreeMap<i64, SubjectMastery> {
  compute_subject_mastery_with(cards, LeitnerBox::clamped(DEFAULT_MASTERY_BOX as i64))
}

/// Per-subject mastery with an explicit threshold box.
///
/// Subjects without active cards are absent from the result.
pub fn compute_subject_mastery_with(
  cards: &[ReviewCard],
  mastery_box: LeitnerBox,
) -> BTreeMap<i64, SubjectMastery> {
  let mut by_subject: BTreeMap<i64, SubjectMastery> = BTreeMap::new();
  for card in cards.iter().filter(|c| c.is_active) {
    let entry = by_subject
      .entry(card.subject_id)
      .or_insert(SubjectMastery { mastered: 0, total: 0 });
    entry.total += 1;
    if card.box_index >= mastery_box {
      entry.mastered += 1;
    }
  }
  by_subject
}

/// Totals over completed review sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
  pub sessions_completed: usize,
  pub total_cards: i64,
  pub correct_cards: i64,
  pub xp_earned: i64,
}

impl SessionSummary {
  pub fn accuracy(&self) -> f64 {
    if self.total_cards > 0 {
      self.correct_cards as f64 / self.total_cards as f64
    } else {
      0.0
    }
  }
}

pub fn summarize_sessions(sessions: &[ReviewSession]) -> SessionSummary {
  sessions
    .iter()
    .filter(|s| s.is_completed())
    .fold(SessionSummary::default(), |mut acc, s| {
      acc.sessions_completed += 1;
      acc.total_cards += s.total_cards;
      acc.correct_cards += s.correct_cards;
      acc.xp_earned += s.xp_earned;
      acc
    })
}

/// Reviews per UTC calendar day, for activity heatmaps.
pub fn review_heatmap(logs: &[ReviewLog]) -> BTreeMap<NaiveDate, usize> {
  let mut days = BTreeMap::new();
  for log in logs {
    *days.entry(log.reviewed_at.date_naive()).or_insert(0) += 1;
  }
  days
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StruggledCard {
  pub card_id: i64,
  pub attempts: usize,
  pub struggles: usize,
}

/// Cards with at least `min_struggles` Again/Hard ratings, most struggled
/// first (ties by card id), capped at `limit`.
pub fn struggled_cards(logs: &[ReviewLog], min_struggles: usize, limit: usize) -> Vec<StruggledCard> {
  let mut per_card: HashMap<i64, StruggledCard> = HashMap::new();
  for log in logs {
    let entry = per_card.entry(log.card_id).or_insert(StruggledCard {
      card_id: log.card_id,
      attempts: 0,
      struggles: 0,
    });
    entry.attempts += 1;
    if log.rating.is_struggle() {
      entry.struggles += 1;
    }
  }

  let mut result: Vec<StruggledCard> = per_card
    .into_values()
    .filter(|c| c.struggles > 0 && c.struggles >= min_struggles)
    .collect();
  result.sort_by(|a, b| b.struggles.cmp(&a.struggles).then(a.card_id.cmp(&b.card_id)));
  result.truncate(limit);
  result
}
