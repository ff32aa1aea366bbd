//! Seeded, reproducible index sampling.
//!
//! Both functions are pure in their arguments: the same seed always yields
//! the same indices in the same order.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::ops::Range;

/// Draw `count` distinct indices from `range` in random order.
///
/// Uses Floyd's algorithm for the selection followed by a Fisher-Yates
/// shuffle, so the cost depends on `count` and not on the range size.
///
/// # Examples
///
/// ```
/// use region_oxide::dataset::sampling::sample_indices;
///
/// let a = sample_indices(7, 5, 100..200).unwrap();
/// let b = sample_indices(7, 5, 100..200).unwrap();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|i| (100..200).contains(i)));
/// ```
pub fn sample_indices(seed: u64, count: usize, range: Range<usize>) -> Result<Vec<usize>> {
    let len = range.end.saturating_sub(range.start);
    if range.end < range.start || count > len {
        return Err(Error::InvalidSampleRange {
            count,
            start: range.start,
            end: range.end,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen = HashSet::with_capacity(count);
    let mut picked = Vec::with_capacity(count);
    for j in (len - count)..len {
        let t = rng.gen_range(0..=j);
        let pick = if chosen.contains(&t) { j } else { t };
        chosen.insert(pick);
        picked.push(range.start + pick);
    }

    picked.shuffle(&mut rng);
    Ok(picked)
}

/// A seeded permutation of `0..n`.
pub fn shuffle_indices(seed: u64, n: usize) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    indices
}
