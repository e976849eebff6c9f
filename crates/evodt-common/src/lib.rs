//! # Evodt Common
//!
//! Shared errors, configuration, and the random source for Evodt, an
//! evolutionary arena for decision-theory strategies.
//!
//! ## Contents
//!
//! - [`EvodtError`]: unified error type with configuration and sampling variants
//! - [`config`]: per-run constants for the three games, layered from file and environment
//! - [`rng`]: the seedable random source threaded through every component

pub mod config;
pub mod error;
pub mod rng;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, DilemmaPayoffs, GameKind, GuessingConfig, PredictorConfig, PredictorPayoffs,
    SignalingConfig, SimulationConfig,
};
pub use error::{ConfigError, EvodtError, Result, SamplingError};
pub use rng::SimRng;

/// Evodt version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Floor applied to a utility before taking its reciprocal for death weighting
pub const MIN_UTILITY: f64 = 1e-9;

/// Upper bound on FDT policy refinement passes (a 3-signal policy has 8 settings)
pub const MAX_POLICY_PASSES: usize = 8;
