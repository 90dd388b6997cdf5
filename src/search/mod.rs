//! The matching engine and its result types.

mod draw;
mod engine;
mod matchset;

pub use draw::draw_outline;
pub use engine::{EngineConfig, MatchEngine, MatchOutcome};
pub use matchset::{LabelMatches, MatchSet};
