//! The three agent variants.

pub mod analysis;
pub mod generation;
pub mod search;

pub use analysis::{AnalysisAgent, lexical_density};
pub use generation::GenerationAgent;
pub use search::SearchAgent;
