//! In-memory reductions used by the summary and map queries
//!
//! Averages over empty input are 0, never NaN.

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::hash::Hash;

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean, 0 for empty input.
pub fn mean_or_zero<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Number of distinct keys.
pub fn count_distinct<K, I>(keys: I) -> usize
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    keys.into_iter().collect::<FxHashSet<K>>().len()
}

/// Occurrences per key. Keys that never occur are absent.
pub fn tally<K, I>(keys: I) -> BTreeMap<K, usize>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Keep the first item seen for each key, in input order.
///
/// Fed newest-first, this yields the latest record per zone.
pub fn first_per_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: FxHashSet<K> = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}
