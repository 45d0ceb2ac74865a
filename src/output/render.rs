use serde::Serialize;

use crate::scoring::{CompositeScore, Factor, RankedCandidate, Ranking, RenderStyle};
use crate::snapshot::{RawFactors, Ticker};

const UNKNOWN: &str = "Unknown";
const NONE: &str = "None";

/// Display strings of one ranked candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub ticker: String,
    pub score: String,
    pub valuation_ratio: String,
    pub dividend_yield: String,
    pub short_term_change: String,
    pub long_term_change: String,
}

impl RenderedRow {
    /// Rendered factor columns in table order
    pub fn factor_columns(&self) -> [(Factor, &str); 4] {
        [
            (Factor::ValuationRatio, self.valuation_ratio.as_str()),
            (Factor::DividendYield, self.dividend_yield.as_str()),
            (Factor::ShortTermChange, self.short_term_change.as_str()),
            (Factor::LongTermChange, self.long_term_change.as_str()),
        ]
    }
}

/// Render one candidate from its score and raw factors.
pub fn render(ticker: &Ticker, score: CompositeScore, factors: &RawFactors) -> RenderedRow {
    let column = |factor: Factor| render_factor(factor.render_style(), factors.get(factor));
    RenderedRow {
        ticker: ticker.to_string(),
        score: render_score(score),
        valuation_ratio: column(Factor::ValuationRatio),
        dividend_yield: column(Factor::DividendYield),
        short_term_change: column(Factor::ShortTermChange),
        long_term_change: column(Factor::LongTermChange),
    }
}

pub fn render_row(candidate: &RankedCandidate) -> RenderedRow {
    render(&candidate.ticker, candidate.score, &candidate.factors)
}

/// Render a whole ranking, keeping its order.
pub fn render_ranking(ranking: &Ranking) -> Vec<RenderedRow> {
    ranking.iter().map(render_row).collect()
}

/// Composite score scaled by 100, two decimals, no suffix
pub fn render_score(score: CompositeScore) -> String {
    match score {
        CompositeScore::Scored(value) => render_float(value * 100.0),
        CompositeScore::Unscored => UNKNOWN.to_string(),
    }
}

pub fn render_factor(style: RenderStyle, value: Option<f64>) -> String {
    match (style, value) {
        (RenderStyle::Ratio, None) => NONE.to_string(),
        (RenderStyle::Ratio, Some(v)) => render_float(v),
        (RenderStyle::FractionalChange, None) => UNKNOWN.to_string(),
        (RenderStyle::FractionalChange, Some(v)) => render_percentage(v),
        (RenderStyle::PercentagePoints, Some(v)) if v > 0.0 => format!("{}%", render_float(v)),
        (RenderStyle::PercentagePoints, _) => NONE.to_string(),
    }
}

pub fn render_float(value: f64) -> String {
    format!("{:.2}", value)
}

/// Fraction rendered as a percentage: 0.2845 -> "28.45%"
pub fn render_percentage(fraction: f64) -> String {
    format!("{}%", render_float(fraction * 100.0))
}
