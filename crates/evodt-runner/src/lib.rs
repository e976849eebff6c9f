//! # Evodt Runner
//!
//! Drives games through generations and reports on them.
//!
//! ## Generation
//!
//! ```text
//! params     = game.parameters(rates)
//! utilities  = Σ_rounds game.play_round(population, params)
//! population = engine.repopulate(population, utilities)
//! ```
//!
//! [`Simulation`] yields one [`GenerationSummary`] per generation and can be
//! restarted from its seed. Summaries go to [`ReportSink`]s: every generation
//! through `record`, and generation 0 plus every `report_interval`th through
//! `report`.

pub mod generation;
pub mod metrics;
pub mod outcome;
pub mod simulation;
pub mod sink;
pub mod trials;

pub use generation::{run_generation, GenerationSummary, SummaryOf};
pub use metrics::PopulationMetrics;
pub use outcome::{mean_final_rates, RunOutcome};
pub use simulation::{initialize, Simulation};
pub use sink::{ChannelSink, NullSink, ReportSink, TracingSink};
pub use trials::run_trials;
