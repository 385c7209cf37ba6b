//! Uniform shuffling and pool sampling.
//!
//! Every function here copies its input; callers' slices are never touched.
//! The `*_with` variants take the random source explicitly so tests can pass
//! a seeded `StdRng`; the plain variants use the thread-local generator.

use rand::Rng;

/// Return a uniformly random permutation of `items`.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
  shuffle_with(items, &mut rand::rng())
}

/// [`shuffle`] with an explicit random source.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
  let mut out = items.to_vec();
  fisher_yates(&mut out, rng);
  out
}

/// Draw `count` distinct elements in random order.
///
/// A `count` of zero, or one at least as large as the input, yields the whole
/// input shuffled rather than a truncated or empty pool.
pub fn select_pool<T: Clone>(items: &[T], count: usize) -> Vec<T> {
  select_pool_with(items, count, &mut rand::rng())
}

/// [`select_pool`] with an explicit random source.
pub fn select_pool_with<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
  let mut out = shuffle_with(items, rng);
  // A prefix of a uniform permutation is a uniform sample without replacement
  if count > 0 && count < out.len() {
    out.truncate(count);
  }
  out
}

/// Knuth shuffle: walk from the end, swapping each slot with one at or before it.
pub(crate) fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
  for i in (1..items.len()).rev() {
    let j = rng.random_range(0..=i);
    items.swap(i, j);
  }
}
