use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::RankError;
use crate::snapshot::Ticker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Price over earnings.
    ValuationRatio,

    /// Dividend yield in percentage points.
    DividendYield,

    /// Change of the price in the short term, as a fraction.
    ShortTermChange,

    /// Change of the price in the long term, as a fraction.
    LongTermChange,
}

impl Factor {
    /// All factors in table order. Aggregation and rendering follow this order.
    pub const ALL: [Factor; 4] = [
        Factor::ValuationRatio,
        Factor::DividendYield,
        Factor::ShortTermChange,
        Factor::LongTermChange,
    ];

    /// Configuration key, e.g. "short_term_change"
    pub fn key(self) -> &'static str {
        match self {
            Factor::ValuationRatio => "valuation_ratio",
            Factor::DividendYield => "dividend_yield",
            Factor::ShortTermChange => "short_term_change",
            Factor::LongTermChange => "long_term_change",
        }
    }

    /// Short column label for tables
    pub fn label(self) -> &'static str {
        match self {
            Factor::ValuationRatio => "P/E",
            Factor::DividendYield => "Yield",
            Factor::ShortTermChange => "Short",
            Factor::LongTermChange => "Long",
        }
    }

    /// Parse a configuration key. The camelCase snapshot spellings are accepted too.
    pub fn parse(s: &str) -> Result<Self, RankError> {
        match s {
            "valuation_ratio" | "valuationRatio" => Ok(Factor::ValuationRatio),
            "dividend_yield" | "dividendYield" => Ok(Factor::DividendYield),
            "short_term_change" | "priceChangeShortTerm" => Ok(Factor::ShortTermChange),
            "long_term_change" | "priceChangeLongTerm" => Ok(Factor::LongTermChange),
            other => Err(RankError::UnknownFactor(other.to_string())),
        }
    }

    pub fn eligibility(self) -> Eligibility {
        match self {
            Factor::ShortTermChange => Eligibility::Negative,
            _ => Eligibility::Positive,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Factor::ValuationRatio => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }

    pub fn default_weight(self) -> f64 {
        match self {
            Factor::ShortTermChange => 2.0,
            _ => 1.0,
        }
    }

    pub fn render_style(self) -> RenderStyle {
        match self {
            Factor::ValuationRatio => RenderStyle::Ratio,
            Factor::DividendYield => RenderStyle::PercentagePoints,
            Factor::ShortTermChange | Factor::LongTermChange => RenderStyle::FractionalChange,
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which raw values count toward a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// Strictly positive values count as they are.
    Positive,
    /// Strictly negative values count by magnitude.
    Negative,
}

impl Eligibility {
    /// Return the scoring magnitude of `value` if it qualifies.
    pub fn admit(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            Eligibility::Positive if value > 0.0 => Some(value),
            Eligibility::Negative if value < 0.0 => Some(value.abs()),
            _ => None,
        }
    }

    /// Keep the candidates whose value is present and qualifies, in input order.
    pub fn filter<'a, I>(self, raw_values: I) -> Vec<(Ticker, f64)>
    where
        I: IntoIterator<Item = (&'a Ticker, Option<f64>)>,
    {
        raw_values
            .into_iter()
            .filter_map(|(ticker, value)| {
                value
                    .and_then(|v| self.admit(v))
                    .map(|magnitude| (ticker.clone(), magnitude))
            })
            .collect()
    }

    pub fn describe(self) -> &'static str {
        match self {
            Eligibility::Positive => "> 0",
            Eligibility::Negative => "< 0 (by magnitude)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    /// Shares are assigned by inverted rank.
    LowerIsBetter,
}

impl Direction {
    pub fn describe(self) -> &'static str {
        match self {
            Direction::HigherIsBetter => "higher is better",
            Direction::LowerIsBetter => "lower is better",
        }
    }
}

/// How a raw factor value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// Plain number with two decimals; absent is "None".
    Ratio,
    /// Fraction scaled by 100 with a `%` suffix; absent is "Unknown".
    FractionalChange,
    /// Already in percentage points, `%` suffix without scaling; absent or
    /// non-positive is "None".
    PercentagePoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorDefinition {
    pub factor: Factor,
    pub eligibility: Eligibility,
    pub direction: Direction,
    pub weight: f64,
    pub style: RenderStyle,
}

impl FactorDefinition {
    pub fn new(factor: Factor, weight: f64) -> Self {
        Self {
            factor,
            eligibility: factor.eligibility(),
            direction: factor.direction(),
            weight,
            style: factor.render_style(),
        }
    }
}

/// Factor definitions of one engine, in `Factor::ALL` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorTable {
    definitions: Vec<FactorDefinition>,
}

impl Default for FactorTable {
    fn default() -> Self {
        Self {
            definitions: Factor::ALL
                .into_iter()
                .map(|factor| FactorDefinition::new(factor, factor.default_weight()))
                .collect(),
        }
    }
}

impl FactorTable {
    /// Start from the default weights and replace the ones listed in `weights`.
    pub fn from_weights(weights: &BTreeMap<String, f64>) -> Result<Self, RankError> {
        let mut table = Self::default();
        let mut seen = BTreeSet::new();
        for (name, &weight) in weights {
            let factor = check_weight(name, weight)?;
            if !seen.insert(factor) {
                return Err(RankError::DuplicateWeight(factor.key().to_string()));
            }
            if let Some(definition) = table.definitions.iter_mut().find(|d| d.factor == factor) {
                definition.weight = weight;
            }
        }
        Ok(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactorDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, factor: Factor) -> Option<&FactorDefinition> {
        self.definitions.iter().find(|d| d.factor == factor)
    }

    pub fn weight(&self, factor: Factor) -> f64 {
        self.get(factor).map_or(0.0, |d| d.weight)
    }
}

/// Resolve a weight entry to its factor, rejecting unknown names and bad weights.
pub fn check_weight(name: &str, weight: f64) -> Result<Factor, RankError> {
    let factor = Factor::parse(name)?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(RankError::InvalidWeight {
            factor: name.to_string(),
            weight,
        });
    }
    Ok(factor)
}
