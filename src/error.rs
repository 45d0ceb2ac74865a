use thiserror::Error;

/// Setup mistakes that stop a ranking run before it starts.
///
/// Missing or unusable factor values are never errors; they only keep a
/// candidate out of that factor's eligible set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    #[error("unknown factor '{0}' (expected one of: valuation_ratio, dividend_yield, short_term_change, long_term_change)")]
    UnknownFactor(String),

    #[error("invalid weight {weight} for factor '{factor}': must be a non-negative finite number")]
    InvalidWeight { factor: String, weight: f64 },

    #[error("duplicate weight for factor '{0}'")]
    DuplicateWeight(String),

    #[error("invalid override for '{ticker}': {reason}")]
    InvalidOverride { ticker: String, reason: String },

    #[error("duplicate candidate '{0}' in snapshot")]
    DuplicateCandidate(String),
}
