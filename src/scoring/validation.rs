use std::collections::{BTreeMap, BTreeSet};

use super::config::ScoringConfig;
use super::factors::check_weight;
use super::overrides::OverrideEntry;
use crate::config::Config;
use crate::error::RankError;

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref scoring) = config.scoring {
        if let Err(scoring_errors) = validate_scoring(scoring) {
            errors.extend(scoring_errors);
        }
    }

    if let Some(ref overrides) = config.overrides {
        if let Err(override_errors) = validate_overrides(overrides) {
            errors.extend(override_errors);
        }
    }

    if let Some(ref advice) = config.advice {
        if advice.count == Some(0) {
            errors.push("advice.count: must be at least 1".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate scoring weights: known factor names, non-negative finite weights.
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref weights) = config.weights {
        let mut seen = BTreeSet::new();
        for (name, &weight) in weights {
            match check_weight(name, weight) {
                Ok(factor) => {
                    if !seen.insert(factor) {
                        let e = RankError::DuplicateWeight(factor.key().to_string());
                        errors.push(format!("scoring.weights.{}: {}", name, e));
                    }
                }
                Err(e) => {
                    let message = match e {
                        RankError::UnknownFactor(_) => e.to_string(),
                        _ => format!("must be a non-negative finite number, got {}", weight),
                    };
                    errors.push(format!("scoring.weights.{}: {}", name, message));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate override entries against the factor record schema.
pub fn validate_overrides(overrides: &BTreeMap<String, OverrideEntry>) -> Result<(), Vec<String>> {
    let errors: Vec<String> = overrides
        .iter()
        .flat_map(|(ticker, entry)| {
            entry
                .check(ticker)
                .into_iter()
                .map(move |e| format!("overrides.{}: {}", ticker, e))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
