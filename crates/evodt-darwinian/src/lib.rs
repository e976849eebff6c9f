//! # Darwinian
//!
//! Selection engine for Evodt populations.
//!
//! ## Repopulation
//!
//! ```text
//! counts  = tally(population)
//! counts  = mutate(counts)                       // round(μ·N) random reassignments
//! counts += births ~ utility                     // round(δ·N) draws
//! counts -= deaths ~ 1 / max(utility, ε)         // round(δ·N) draws
//! next    = realize(counts / N)
//! ```
//!
//! Where:
//! - μ: mutation rate
//! - δ: death rate
//! - N: fixed population size
//!
//! Every step preserves `Σ counts = N`.

pub mod culling;
pub mod engine;
pub mod fitness;
pub mod population;
pub mod sampler;

pub use engine::{EvolutionEngine, RepopulationReport};
pub use population::{PopulationRates, PopulationState, Strategy};
pub use sampler::WeightedSampler;
