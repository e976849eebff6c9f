//! Repopulation engine
pub mod mutation;
pub mod repopulate;

pub use self::repopulate::{EvolutionEngine, RepopulationReport};
