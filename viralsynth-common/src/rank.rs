//! Client-side ranking of fetched collections

use crate::models::Pattern;
use crate::query::SortKey;

/// Order `items` by `metric`, highest first, into a new vector
///
/// The sort is stable: items whose metrics compare equal keep their input
/// order. `0.0` and `-0.0` compare equal. Ordering is total
/// ([`f64::total_cmp`]), so a NaN metric ranks above every number.
pub fn rank_by<T, F>(items: &[T], metric: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<(f64, &T)> = items
        .iter()
        .map(|item| (normalize_zero(metric(item)), item))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    ranked.into_iter().map(|(_, item)| item.clone()).collect()
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Rank patterns for display; absent metrics count as zero
pub fn rank_patterns(patterns: &[Pattern], key: SortKey) -> Vec<Pattern> {
    rank_by(patterns, |p| p.metric(key))
}
