pub mod advice;
pub mod config;
pub mod error;
pub mod output;
pub mod scoring;
pub mod snapshot;

pub use error::RankError;

use output::RenderedRow;
use scoring::ScoringEngine;
use snapshot::Candidates;

/// Rank a snapshot and render every row, best first.
pub fn rank_snapshot(engine: &ScoringEngine, snapshot: &Candidates) -> Vec<RenderedRow> {
    output::render_ranking(&engine.rank(snapshot))
}
