//! Allocation advice: split an investment across the top of a ranking in
//! proportion to composite scores.

use serde::Serialize;

use crate::output::render::render_percentage;
use crate::scoring::Ranking;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceEntry {
    pub ticker: String,
    /// Rendered share, e.g. "66.67%"
    pub ratio: String,
    #[serde(skip)]
    pub share: f64,
}

/// Number of candidates to allocate across when none is configured:
/// half of the universe, but at least one.
pub fn default_count(candidates: usize) -> usize {
    if candidates == 0 {
        0
    } else {
        (candidates / 2).max(1)
    }
}

/// Allocate across the first `count` scored candidates of `ranking`.
///
/// Unscored candidates never receive an allocation. When the selected scores
/// sum to zero every selected candidate gets an equal share.
pub fn advise(ranking: &Ranking, count: usize) -> Vec<AdviceEntry> {
    let selected: Vec<(&str, f64)> = ranking
        .iter()
        .filter_map(|e| e.score.value().map(|score| (e.ticker.as_str(), score)))
        .take(count)
        .collect();
    if selected.is_empty() {
        return Vec::new();
    }

    let total: f64 = selected.iter().map(|(_, score)| score).sum();
    let equal_share = 1.0 / selected.len() as f64;

    selected
        .into_iter()
        .map(|(ticker, score)| {
            let share = if total > 0.0 { score / total } else { equal_share };
            AdviceEntry {
                ticker: ticker.to_string(),
                ratio: render_percentage(share),
                share,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{FactorTable, OverrideEntry, OverrideTable, ScoringEngine};
    use crate::snapshot::{Candidates, RawFactors};
    use std::collections::BTreeMap;

    fn short_term(value: f64) -> RawFactors {
        RawFactors {
            short_term_change: Some(value),
            ..Default::default()
        }
    }

    fn ranking(pairs: &[(&str, f64)]) -> Ranking {
        let snapshot = Candidates::try_from_iter(pairs.iter().map(|(t, v)| (*t, short_term(*v)))).unwrap();
        ScoringEngine::default().rank(&snapshot)
    }

    #[test]
    fn test_default_count() {
        assert_eq!(default_count(0), 0);
        assert_eq!(default_count(1), 1);
        assert_eq!(default_count(3), 1);
        assert_eq!(default_count(10), 5);
    }

    #[test]
    fn test_advise_proportional_to_score() {
        let ranking = ranking(&[("A", -0.10), ("B", -0.05), ("C", -0.01)]);
        let advice = advise(&ranking, 2);

        assert_eq!(advice.len(), 2);
        assert_eq!(advice[0].ticker, "A");
        assert_eq!(advice[0].ratio, "66.67%");
        assert_eq!(advice[1].ticker, "B");
        assert_eq!(advice[1].ratio, "33.33%");
        let sum: f64 = advice.iter().map(|a| a.share).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_advise_count_larger_than_ranking() {
        let ranking = ranking(&[("A", -0.10), ("B", -0.10)]);
        let advice = advise(&ranking, 10);
        assert_eq!(advice.len(), 2);
        assert_eq!(advice[0].ratio, "50.00%");
    }

    #[test]
    fn test_advise_zero_scores_split_equally() {
        let ranking = ranking(&[("A", 0.1), ("B", 0.2)]);
        let advice = advise(&ranking, 2);
        assert_eq!(advice.len(), 2);
        assert!(advice.iter().all(|a| a.ratio == "50.00%"));
    }

    #[test]
    fn test_advise_skips_unscored() {
        let snapshot = Candidates::try_from_iter([("X", short_term(-0.2)), ("A", short_term(-0.1))]).unwrap();
        let overrides = OverrideTable::from_config(&BTreeMap::from([(
            "X".to_string(),
            OverrideEntry {
                unscored: true,
                ..Default::default()
            },
        )]))
        .unwrap();
        let ranking = ScoringEngine::new(FactorTable::default(), overrides).rank(&snapshot);

        let advice = advise(&ranking, 2);
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].ticker, "A");
        assert_eq!(advice[0].ratio, "100.00%");
    }

    #[test]
    fn test_advise_empty() {
        assert!(advise(&Ranking::default(), 3).is_empty());
        let ranking = ranking(&[("A", -0.1)]);
        assert!(advise(&ranking, 0).is_empty());
    }
}
