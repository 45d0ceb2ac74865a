use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::{OverrideEntry, ScoringConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Ticker -> replacement factor record
    #[serde(default)]
    pub overrides: Option<BTreeMap<String, OverrideEntry>>,

    #[serde(default)]
    pub advice: Option<AdviceConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AdviceConfig {
    /// Number of top candidates to allocate across (default: half the candidates)
    #[serde(default)]
    pub count: Option<usize>,
}
