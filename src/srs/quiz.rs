//! Quiz randomization: question pool draw plus per-question option order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::permutation::{select_pool_with, shuffle_with};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub id: i64,
  pub prompt: String,
  pub options: Vec<String>,
  /// Index into `options` of the right answer
  pub correct_index: usize,
}

impl QuizQuestion {
  pub fn correct_option(&self) -> Option<&str> {
    self.options.get(self.correct_index).map(String::as_str)
  }
}

/// Draw `pool_size` questions (0 = all) and shuffle each question's options.
///
/// `correct_index` is remapped so it still points at the same answer text.
pub fn randomize_quiz(questions: &[QuizQuestion], pool_size: usize) -> Vec<QuizQuestion> {
  randomize_quiz_with(questions, pool_size, &mut rand::rng())
}

pub fn randomize_quiz_with<R: Rng + ?Sized>(
  questions: &[QuizQuestion],
  pool_size: usize,
  rng: &mut R,
) -> Vec<QuizQuestion> {
  select_pool_with(questions, pool_size, rng)
    .into_iter()
    .map(|q| shuffle_options(q, rng))
    .collect()
}

fn shuffle_options<R: Rng + ?Sized>(question: QuizQuestion, rng: &mut R) -> QuizQuestion {
  // Shuffle positions rather than strings so duplicate option texts stay unambiguous
  let positions: Vec<usize> = (0..question.options.len()).collect();
  let order = shuffle_with(&positions, rng);

  let correct_index = order
    .iter()
    .position(|&old| old == question.correct_index)
    .unwrap_or(question.correct_index);
  let options = order.iter().map(|&old| question.options[old].clone()).collect();

  QuizQuestion {
    options,
    correct_index,
    ..question
  }
}
