//! Fitness weighting for utility-proportional births
pub mod calculator;

pub use self::calculator::FitnessCalculator;
