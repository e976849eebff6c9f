//! Error types for Evodt simulations
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using EvodtError
pub type Result<T> = std::result::Result<T, EvodtError>;

/// Unified error type for Evodt operations
#[derive(Debug, Error)]
pub enum EvodtError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Sampling errors
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    // Config source errors (files, environment)
    #[error("Config source error: {0}")]
    ConfigSource(String),
}

/// Invalid configuration, detected at construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Negative weight {weight} at entry {index}")]
    NegativeWeight { index: usize, weight: f64 },

    #[error("Non-finite weight at entry {index}")]
    NonFiniteWeight { index: usize },

    #[error("Rates must sum to 1, got {sum}")]
    RatesNotNormalized { sum: f64 },

    #[error("Rate {rate} for {label} is outside [0, 1]")]
    RateOutOfRange { label: String, rate: f64 },

    #[error("Expected {expected} rates, got {actual}")]
    RateArity { expected: usize, actual: usize },

    #[error("{name} must be positive")]
    NonPositiveCount { name: &'static str },

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Payoffs must satisfy {ordering}")]
    PayoffOrdering { ordering: &'static str },

    #[error("Population size must be even for pairwise play, got {0}")]
    OddPopulation(usize),

    #[error("Utility vector has {actual} entries, expected {expected}")]
    UtilityArity { expected: usize, actual: usize },

    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

/// Random selection could not produce a valid draw
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("Cannot sample from a sampler with zero total weight")]
    ZeroTotalWeight,

    #[error("Gave up after {attempts} resamples looking for a living {purpose} candidate")]
    ResampleExhausted { purpose: &'static str, attempts: usize },

    #[error("Permutation exhausted after {selected} of {requested} mutation slots")]
    PermutationExhausted { selected: usize, requested: usize },
}

impl From<config::ConfigError> for EvodtError {
    fn from(err: config::ConfigError) -> Self {
        EvodtError::ConfigSource(err.to_string())
    }
}
