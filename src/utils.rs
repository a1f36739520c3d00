//! Sequence helpers used to prepare the catalogue: shuffling, deduplication and suggestions.

use std::hash::Hash;

use indexmap::IndexSet;
use rand::Rng;

/// Shuffle `items` in place using the thread-local random source.
pub fn shuffle<T>(items: &mut [T]) {
    let mut rng = rand::rng();
    shuffle_with(items, &mut rng);
}

/// Shuffle `items` in place with a backward Fisher–Yates sweep driven by `rng`.
///
/// For every index `i` from the end down to 1 a uniformly random `j` in `[0, i]`
/// is drawn and the two elements are swapped. Slices of length 0 or 1 are left
/// untouched and consume no randomness.
pub fn shuffle_with<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Return the distinct values of `items` in order of first occurrence.
pub fn dedup<T>(items: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    items
        .iter()
        .cloned()
        .collect::<IndexSet<T>>()
        .into_iter()
        .collect()
}

/// Possibilities containing `query` (case-insensitive), in list order, capped at `limit`.
///
/// An empty or blank query matches nothing.
pub fn suggestions<'a>(possibilities: &'a [String], query: &str, limit: usize) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    possibilities
        .iter()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .map(String::as_str)
        .take(limit)
        .collect()
}
