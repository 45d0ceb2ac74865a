pub mod loader;
pub mod types;

pub use loader::{load_snapshot, parse_snapshot};
pub use types::{Candidates, RawFactors, Ticker};
