//! Fitness: birth weight = utility, death weight = 1 / max(utility, ε)

use evodt_common::MIN_UTILITY;

pub struct FitnessCalculator;

impl FitnessCalculator {
    /// Weight for utility-proportional reproduction
    pub fn birth_weight(utility: f64) -> f64 {
        utility
    }

    /// Weight for inverse-utility culling.
    ///
    /// Utilities at or below [`MIN_UTILITY`] are clamped so a zero payoff maps
    /// to a large finite weight rather than infinity.
    pub fn death_weight(utility: f64) -> f64 {
        1.0 / utility.max(MIN_UTILITY)
    }

    /// Whether `death_weight` had to clamp this utility
    pub fn is_degenerate(utility: f64) -> bool {
        utility < MIN_UTILITY
    }
}
