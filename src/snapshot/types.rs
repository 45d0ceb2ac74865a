use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use crate::error::RankError;
use crate::scoring::Factor;

/// Code name of an instrument, e.g. "NESN".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ticker {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Ticker {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw factor values of one candidate, each independently optional.
///
/// `dividend_yield` is expressed in percentage points (2.5 means 2.5%), while
/// both price changes are fractions (-0.1 means -10%).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawFactors {
    pub valuation_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub short_term_change: Option<f64>,
    pub long_term_change: Option<f64>,
}

impl RawFactors {
    /// Value of a single factor, if present
    pub fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::ValuationRatio => self.valuation_ratio,
            Factor::DividendYield => self.dividend_yield,
            Factor::ShortTermChange => self.short_term_change,
            Factor::LongTermChange => self.long_term_change,
        }
    }

    /// Iterate over the fields that carry a value
    pub fn present(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL
            .into_iter()
            .filter_map(move |factor| self.get(factor).map(|value| (factor, value)))
    }
}

/// The ranking universe of one run, in input order.
///
/// Input order is the enumeration order every tie-break falls back to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates {
    entries: Vec<(Ticker, RawFactors)>,
    index: HashMap<Ticker, usize>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(ticker, factors)` pairs, rejecting duplicate tickers
    pub fn try_from_iter<I, T>(iter: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = (T, RawFactors)>,
        T: Into<Ticker>,
    {
        let mut candidates = Self::new();
        for (ticker, factors) in iter {
            candidates.push(ticker.into(), factors)?;
        }
        Ok(candidates)
    }

    /// Append a candidate at the end of the enumeration order
    pub fn push(&mut self, ticker: Ticker, factors: RawFactors) -> Result<(), RankError> {
        if self.index.contains_key(&ticker) {
            return Err(RankError::DuplicateCandidate(ticker.to_string()));
        }
        self.index.insert(ticker.clone(), self.entries.len());
        self.entries.push((ticker, factors));
        Ok(())
    }

    pub fn get(&self, ticker: &str) -> Option<&RawFactors> {
        self.index.get(ticker).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.index.contains_key(ticker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, &RawFactors)> {
        self.entries.iter().map(|(ticker, factors)| (ticker, factors))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a copy in which the factors of every ticker in `replacements`
    /// are swapped out. Tickers not present yet are appended after the
    /// existing entries, in ticker order.
    pub(crate) fn with_replaced(&self, replacements: &HashMap<Ticker, RawFactors>) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(ticker, factors)| {
                let factors = replacements.get(ticker).copied().unwrap_or(*factors);
                (ticker.clone(), factors)
            })
            .collect();
        let mut merged = Self {
            entries,
            index: self.index.clone(),
        };

        let mut added: Vec<(&Ticker, &RawFactors)> = replacements
            .iter()
            .filter(|(ticker, _)| !self.index.contains_key(*ticker))
            .collect();
        added.sort_by(|a, b| a.0.cmp(b.0));
        for (ticker, factors) in added {
            merged.index.insert(ticker.clone(), merged.entries.len());
            merged.entries.push((ticker.clone(), *factors));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_term(value: f64) -> RawFactors {
        RawFactors {
            short_term_change: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_candidates_keep_input_order() {
        let candidates =
            Candidates::try_from_iter([("C", short_term(-0.1)), ("A", short_term(-0.2)), ("B", short_term(0.3))])
                .unwrap();
        let tickers: Vec<&str> = candidates.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tickers, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_candidates_reject_duplicates() {
        let result = Candidates::try_from_iter([("A", short_term(-0.1)), ("A", short_term(-0.2))]);
        assert_eq!(result.unwrap_err(), RankError::DuplicateCandidate("A".to_string()));
    }

    #[test]
    fn test_candidates_lookup_by_str() {
        let candidates = Candidates::try_from_iter([("NESN", short_term(-0.1))]).unwrap();
        assert_eq!(candidates.get("NESN"), Some(&short_term(-0.1)));
        assert!(candidates.get("AAPL").is_none());
        assert!(candidates.contains("NESN"));
    }

    #[test]
    fn test_with_replaced_keeps_order() {
        let candidates =
            Candidates::try_from_iter([("A", short_term(-0.1)), ("B", short_term(-0.2))]).unwrap();
        let replacements = HashMap::from([(Ticker::from("A"), RawFactors::default())]);
        let replaced = candidates.with_replaced(&replacements);

        let tickers: Vec<&str> = replaced.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tickers, vec!["A", "B"]);
        assert_eq!(replaced.get("A"), Some(&RawFactors::default()));
        assert_eq!(replaced.get("B"), Some(&short_term(-0.2)));
    }

    #[test]
    fn test_raw_factors_present_skips_absent() {
        let factors = RawFactors {
            valuation_ratio: Some(12.0),
            long_term_change: Some(0.5),
            ..Default::default()
        };
        let present: Vec<_> = factors.present().collect();
        assert_eq!(
            present,
            vec![(Factor::ValuationRatio, 12.0), (Factor::LongTermChange, 0.5)]
        );
    }

    #[test]
    fn test_with_replaced_appends_new_tickers_sorted() {
        let candidates = Candidates::try_from_iter([("M", short_term(-0.1))]).unwrap();
        let replacements = HashMap::from([
            (Ticker::from("Z"), short_term(-0.3)),
            (Ticker::from("B"), short_term(-0.2)),
            (Ticker::from("M"), RawFactors::default()),
        ]);
        let replaced = candidates.with_replaced(&replacements);

        let tickers: Vec<&str> = replaced.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tickers, vec!["M", "B", "Z"]);
        assert_eq!(replaced.get("M"), Some(&RawFactors::default()));
        assert_eq!(replaced.get("Z"), Some(&short_term(-0.3)));
        assert_eq!(replaced.len(), 3);
    }
}
