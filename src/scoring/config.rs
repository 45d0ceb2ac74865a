use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::factors::Factor;

/// Main scoring configuration.
///
/// Weights multiply each factor's normalized shares before they are summed
/// into the composite score. Factors left out keep their default weight.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     valuation_ratio: 1
///     dividend_yield: 1
///     short_term_change: 2
///     long_term_change: 1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Factor name -> non-negative weight
    #[serde(default)]
    pub weights: Option<BTreeMap<String, f64>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Some(
                Factor::ALL
                    .into_iter()
                    .map(|factor| (factor.key().to_string(), factor.default_weight()))
                    .collect(),
            ),
        }
    }
}
