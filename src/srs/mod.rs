pub mod aggregate;
pub mod leitner;
pub mod permutation;
pub mod queue;
pub mod quiz;

pub use aggregate::{
  compute_card_distribution, compute_subject_mastery, compute_subject_mastery_with, review_heatmap,
  struggled_cards, summarize_sessions, SessionSummary, StruggledCard, SubjectMastery,
};
pub use leitner::{LeitnerPolicy, ReviewOutcome};
pub use permutation::{select_pool, select_pool_with, shuffle, shuffle_with};
pub use queue::{build_review_queue, build_review_queue_with, count_due, next_due_at};
pub use quiz::{randomize_quiz, randomize_quiz_with, QuizQuestion};
