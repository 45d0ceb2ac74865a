use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::RankError;
use crate::snapshot::{Candidates, RawFactors, Ticker};

/// Manually supplied factor values for one ticker.
///
/// Used when upstream market data of some exchanges is unavailable. The entry
/// replaces the computed record as a whole; fields left out stay absent.
///
/// Example YAML:
/// ```yaml
/// overrides:
///   NESN:
///     valuation_ratio: 18.55
///     short_term_change: 0.2717
///     long_term_change: 0.009
///   XYZ:
///     unscored: true
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_ratio: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_term_change: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_term_change: Option<f64>,

    /// Keep the candidate in the report but do not score it
    #[serde(default)]
    pub unscored: bool,
}

impl OverrideEntry {
    pub fn factors(&self) -> RawFactors {
        RawFactors {
            valuation_ratio: self.valuation_ratio,
            dividend_yield: self.dividend_yield,
            short_term_change: self.short_term_change,
            long_term_change: self.long_term_change,
        }
    }

    /// Every problem with this entry, in factor order.
    pub fn check(&self, ticker: &str) -> Vec<RankError> {
        let mut errors = Vec::new();
        if ticker.trim().is_empty() {
            errors.push(RankError::InvalidOverride {
                ticker: ticker.to_string(),
                reason: "ticker must not be empty".to_string(),
            });
        } else if ticker.trim() != ticker {
            errors.push(RankError::InvalidOverride {
                ticker: ticker.to_string(),
                reason: "ticker must not have leading or trailing whitespace".to_string(),
            });
        }
        for (factor, value) in self.factors().present() {
            if !value.is_finite() {
                errors.push(RankError::InvalidOverride {
                    ticker: ticker.to_string(),
                    reason: format!("{} must be a finite number, got {}", factor, value),
                });
            }
        }
        errors
    }
}

/// Static override configuration, applied identically to every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    factors: HashMap<Ticker, RawFactors>,
    unscored: HashSet<Ticker>,
}

impl OverrideTable {
    pub fn from_config(entries: &BTreeMap<String, OverrideEntry>) -> Result<Self, RankError> {
        let mut table = Self::default();
        for (ticker, entry) in entries {
            if let Some(error) = entry.check(ticker).into_iter().next() {
                return Err(error);
            }
            let ticker = Ticker::from(ticker.as_str());
            if entry.unscored {
                table.unscored.insert(ticker.clone());
            }
            table.factors.insert(ticker, entry.factors());
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn is_unscored(&self, ticker: &str) -> bool {
        self.unscored.contains(ticker)
    }

    /// Replace the computed record of every overridden ticker.
    ///
    /// Overridden tickers missing from `computed` join the universe after
    /// the snapshot entries, in ticker order.
    pub fn merge(&self, computed: &Candidates) -> Candidates {
        for ticker in self.factors.keys() {
            if computed.contains(ticker.as_str()) {
                tracing::debug!(%ticker, "applying override");
            } else {
                tracing::debug!(%ticker, "adding override-only candidate");
            }
        }
        computed.with_replaced(&self.factors)
    }
}
