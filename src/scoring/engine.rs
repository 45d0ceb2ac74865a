use std::cmp::Ordering;
use std::collections::HashMap;

use super::factors::{Direction, Factor, FactorDefinition, FactorTable};
use super::normalize::{invert, normalize, ShareMap};
use super::overrides::OverrideTable;
use crate::config::Config;
use crate::error::RankError;
use crate::snapshot::{Candidates, RawFactors, Ticker};

/// Composite score of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompositeScore {
    Scored(f64),
    /// Deliberately left out of scoring by an override entry.
    Unscored,
}

impl CompositeScore {
    pub fn value(self) -> Option<f64> {
        match self {
            CompositeScore::Scored(v) => Some(v),
            CompositeScore::Unscored => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub factor: Factor,
    pub share: Option<f64>, // None when not eligible for this factor
    pub weight: f64,
    pub contribution: f64, // weight * share, 0 when not eligible
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub ticker: Ticker,
    /// Factors after overrides were applied
    pub factors: RawFactors,
    pub score: CompositeScore,
    pub breakdown: Vec<FactorContribution>,
}

/// Candidates ordered by descending composite score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    entries: Vec<RankedCandidate>,
}

impl Ranking {
    pub fn entries(&self) -> &[RankedCandidate] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedCandidate> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tickers(&self) -> Vec<&Ticker> {
        self.entries.iter().map(|e| &e.ticker).collect()
    }
}

/// Multi-factor ranking engine.
///
/// Holds the factor table and the override table; both are fixed at
/// construction, so one engine can rank any number of snapshots.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    table: FactorTable,
    overrides: OverrideTable,
}

impl ScoringEngine {
    pub fn new(table: FactorTable, overrides: OverrideTable) -> Self {
        Self { table, overrides }
    }

    /// Build the engine from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, RankError> {
        let table = match config.scoring.as_ref().and_then(|s| s.weights.as_ref()) {
            Some(weights) => FactorTable::from_weights(weights)?,
            None => FactorTable::default(),
        };
        let overrides = match config.overrides {
            Some(ref entries) => OverrideTable::from_config(entries)?,
            None => OverrideTable::default(),
        };
        Ok(Self::new(table, overrides))
    }

    pub fn table(&self) -> &FactorTable {
        &self.table
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Run the whole pipeline on one snapshot.
    pub fn rank(&self, snapshot: &Candidates) -> Ranking {
        let candidates = self.overrides.merge(snapshot);
        let shares = self.factor_shares(&candidates);
        let scores = aggregate(&shares, &self.table, &candidates);

        let mut entries: Vec<RankedCandidate> = candidates
            .iter()
            .map(|(ticker, factors)| {
                let score = if self.overrides.is_unscored(ticker.as_str()) {
                    CompositeScore::Unscored
                } else {
                    CompositeScore::Scored(scores.get(ticker).copied().unwrap_or(0.0))
                };
                RankedCandidate {
                    ticker: ticker.clone(),
                    factors: *factors,
                    score,
                    breakdown: self.breakdown(ticker, &shares),
                }
            })
            .collect();

        sort_by_score(&mut entries, |e| e.score);
        Ranking { entries }
    }

    /// Normalized shares of every factor, in table order.
    ///
    /// Unscored candidates take no part in any factor.
    pub fn factor_shares(&self, candidates: &Candidates) -> Vec<(Factor, ShareMap)> {
        self.table
            .iter()
            .map(|definition| {
                let eligible = self.eligible(definition, candidates);
                tracing::debug!(
                    factor = %definition.factor,
                    eligible = eligible.len(),
                    "computed eligible set"
                );
                let shares = match definition.direction {
                    Direction::HigherIsBetter => normalize(&eligible),
                    Direction::LowerIsBetter => invert(&eligible),
                };
                (definition.factor, shares)
            })
            .collect()
    }

    fn eligible(&self, definition: &FactorDefinition, candidates: &Candidates) -> Vec<(Ticker, f64)> {
        definition.eligibility.filter(
            candidates
                .iter()
                .filter(|(ticker, _)| !self.overrides.is_unscored(ticker.as_str()))
                .map(|(ticker, factors)| (ticker, factors.get(definition.factor))),
        )
    }

    fn breakdown(&self, ticker: &Ticker, shares: &[(Factor, ShareMap)]) -> Vec<FactorContribution> {
        shares
            .iter()
            .map(|(factor, map)| {
                let weight = self.table.weight(*factor);
                let share = map.get(ticker).copied();
                FactorContribution {
                    factor: *factor,
                    share,
                    weight,
                    contribution: share.map_or(0.0, |s| s * weight),
                }
            })
            .collect()
    }
}

/// Weighted sum of every candidate's shares.
///
/// Every candidate of `universe` gets an entry; missing shares count as 0.
/// Factors are summed in the order of `per_factor_shares`.
pub fn aggregate(
    per_factor_shares: &[(Factor, ShareMap)],
    table: &FactorTable,
    universe: &Candidates,
) -> HashMap<Ticker, f64> {
    universe
        .iter()
        .map(|(ticker, _)| {
            let score = per_factor_shares
                .iter()
                .map(|(factor, shares)| table.weight(*factor) * shares.get(ticker).copied().unwrap_or(0.0))
                .sum();
            (ticker.clone(), score)
        })
        .collect()
}

/// Order tickers by descending score. Equal scores keep their given order and
/// unscored tickers go last.
pub fn rank(scores: &[(Ticker, CompositeScore)]) -> Vec<Ticker> {
    let mut ordered = scores.to_vec();
    sort_by_score(&mut ordered, |(_, score)| *score);
    ordered.into_iter().map(|(ticker, _)| ticker).collect()
}

fn sort_by_score<T, F>(items: &mut [T], score: F)
where
    F: Fn(&T) -> CompositeScore,
{
    // slice::sort_by is stable
    items.sort_by(|a, b| compare_scores(score(a), score(b)));
}

fn compare_scores(a: CompositeScore, b: CompositeScore) -> Ordering {
    match (a, b) {
        (CompositeScore::Scored(x), CompositeScore::Scored(y)) => y.total_cmp(&x),
        (CompositeScore::Scored(_), CompositeScore::Unscored) => Ordering::Less,
        (CompositeScore::Unscored, CompositeScore::Scored(_)) => Ordering::Greater,
        (CompositeScore::Unscored, CompositeScore::Unscored) => Ordering::Equal,
    }
}
