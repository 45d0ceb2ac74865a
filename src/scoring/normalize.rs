//! Share normalisation for one factor's eligible set.

use std::collections::HashMap;

use crate::snapshot::Ticker;

/// Eligible candidate -> proportional share of the factor total.
pub type ShareMap = HashMap<Ticker, f64>;

/// Proportional normalisation: each value divided by the sum of all values.
///
/// An empty input, or one whose total is zero or not finite, yields an empty
/// map so a degenerate factor contributes nothing.
pub fn normalize(values: &[(Ticker, f64)]) -> ShareMap {
    if values.is_empty() {
        return ShareMap::new();
    }

    let total: f64 = values.iter().map(|(_, v)| v).sum();
    if total == 0.0 || !total.is_finite() {
        tracing::warn!(
            candidates = values.len(),
            total,
            "degenerate factor total, skipping normalisation"
        );
        return ShareMap::new();
    }

    values
        .iter()
        .map(|(ticker, v)| (ticker.clone(), v / total))
        .collect()
}

/// Rank-swapped normalisation for "lower is better" factors.
///
/// The candidate with the smallest value receives the largest value of the
/// set, the second smallest the second largest, and so on; the swapped values
/// are then normalised. Magnitudes move by rank position, so this is not `1/v`.
pub fn invert(values: &[(Ticker, f64)]) -> ShareMap {
    normalize(&rank_swap(values))
}

/// Reassign the value multiset in reverse rank order.
///
/// Equal values keep their input order (stable sort).
pub fn rank_swap(values: &[(Ticker, f64)]) -> Vec<(Ticker, f64)> {
    let mut ascending: Vec<usize> = (0..values.len()).collect();
    ascending.sort_by(|&a, &b| values[a].1.total_cmp(&values[b].1));

    let mut descending_values: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
    descending_values.sort_by(|a, b| b.total_cmp(a));

    ascending
        .into_iter()
        .zip(descending_values)
        .map(|(i, v)| (values[i].0.clone(), v))
        .collect()
}
