use super::types::{Candidates, RawFactors, Ticker};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One element of the snapshot JSON array
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CandidateRecord {
    ticker: String,
    #[serde(default, alias = "valuationRatio")]
    valuation_ratio: Option<f64>,
    #[serde(default, alias = "dividendYield")]
    dividend_yield: Option<f64>,
    #[serde(default, alias = "priceChangeShortTerm")]
    short_term_change: Option<f64>,
    #[serde(default, alias = "priceChangeLongTerm")]
    long_term_change: Option<f64>,
}

impl CandidateRecord {
    fn into_parts(self) -> (Ticker, RawFactors) {
        let factors = RawFactors {
            valuation_ratio: self.valuation_ratio,
            dividend_yield: self.dividend_yield,
            short_term_change: self.short_term_change,
            long_term_change: self.long_term_change,
        };
        (Ticker::from(self.ticker), factors)
    }
}

/// Load a factor snapshot from a JSON file, or from stdin when `path` is
/// `None` or `-`.
pub fn load_snapshot(path: Option<&Path>) -> Result<Candidates> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open snapshot file at {}", path.display()))?;
            parse_snapshot(file)
                .with_context(|| format!("Failed to load snapshot from {}", path.display()))
        }
        _ => parse_snapshot(std::io::stdin().lock()).context("Failed to load snapshot from stdin"),
    }
}

/// Parse a snapshot: a JSON array of `{"ticker": ..., <factor>: ...}` records.
///
/// Array order becomes the enumeration order of the returned candidates.
pub fn parse_snapshot<R: Read>(reader: R) -> Result<Candidates> {
    let records: Vec<CandidateRecord> =
        serde_json::from_reader(reader).context("Failed to deserialize the snapshot as JSON")?;

    let mut candidates = Candidates::new();
    for record in records {
        if record.ticker.trim().is_empty() {
            anyhow::bail!("Snapshot contains a record with an empty ticker");
        }
        if record.ticker.trim() != record.ticker {
            anyhow::bail!("Snapshot ticker '{}' has leading or trailing whitespace", record.ticker);
        }
        let (ticker, factors) = record.into_parts();
        candidates.push(ticker, factors)?;
    }

    tracing::debug!(count = candidates.len(), "loaded snapshot");
    Ok(candidates)
}
