pub mod config;
pub mod engine;
pub mod factors;
pub mod normalize;
pub mod overrides;
pub mod validation;

pub use config::*;
pub use engine::{aggregate, rank, CompositeScore, FactorContribution, RankedCandidate, Ranking, ScoringEngine};
pub use factors::{Direction, Eligibility, Factor, FactorDefinition, FactorTable, RenderStyle};
pub use normalize::{invert, normalize, ShareMap};
pub use overrides::{OverrideEntry, OverrideTable};
pub use validation::{validate_config, validate_overrides, validate_scoring};
