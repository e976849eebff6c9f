//! Closed-form guesses for the Causal and Functional guessers
//!
//! Both values solve the same 2×2 linear system by Cramer's rule. Random
//! guessers contribute their expected guess (half the guess ceiling). When
//! Random and Functional agents are both absent, their share ratios are 0.

use evodt_darwinian::PopulationRates;

use super::Guesser;

fn determinant(m: [[f64; 2]; 2]) -> f64 {
    m[0][0] * m[1][1] - m[0][1] * m[1][0]
}

struct System {
    causal: f64,
    random: f64,
    functional: f64,
    random_share: f64,
    functional_share: f64,
    frac: f64,
    mean_random: f64,
}

impl System {
    fn new(rates: &PopulationRates<Guesser>, frac: f64, guess_ceiling: f64) -> Self {
        let causal = rates.get(Guesser::Causal);
        let random = rates.get(Guesser::Random);
        let functional = rates.get(Guesser::Functional);
        let others = random + functional;
        let (random_share, functional_share) = if others > 0.0 {
            (random / others, functional / others)
        } else {
            (0.0, 0.0)
        };
        Self {
            causal,
            random,
            functional,
            random_share,
            functional_share,
            frac,
            mean_random: guess_ceiling / 2.0,
        }
    }

    fn denominator(&self) -> f64 {
        determinant([
            [1.0, -self.functional_share * self.frac],
            [-self.causal * self.frac, 1.0 - self.functional * self.frac],
        ])
    }
}

/// The Causal guessers' best response to the current population
pub fn causal(rates: &PopulationRates<Guesser>, frac: f64, guess_ceiling: f64) -> f64 {
    let s = System::new(rates, frac, guess_ceiling);
    let numerator = determinant([
        [
            s.random_share * s.frac * s.mean_random,
            -s.functional_share * s.frac,
        ],
        [
            s.random * s.frac * s.mean_random,
            1.0 - s.functional * s.frac,
        ],
    ]);
    numerator / s.denominator()
}

/// The Functional guessers' best response to the current population
pub fn functional(rates: &PopulationRates<Guesser>, frac: f64, guess_ceiling: f64) -> f64 {
    let s = System::new(rates, frac, guess_ceiling);
    let numerator = determinant([
        [1.0, s.random_share * s.frac * s.mean_random],
        [-s.causal * s.frac, s.random * s.frac * s.mean_random],
    ]);
    numerator / s.denominator()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAC: f64 = 2.0 / 3.0;

    fn rates(c: f64, r: f64, f: f64) -> PopulationRates<Guesser> {
        PopulationRates::new(vec![c, r, f]).unwrap()
    }

    #[test]
    fn test_all_random_population() {
        let r = rates(0.0, 1.0, 0.0);
        // two thirds of the expected random guess
        assert!((causal(&r, FRAC, 100.0) - 100.0 / 3.0).abs() < 1e-9);
        assert!((functional(&r, FRAC, 100.0) - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_causal_population_guesses_zero() {
        let r = rates(1.0, 0.0, 0.0);
        assert_eq!(causal(&r, FRAC, 100.0), 0.0);
        assert_eq!(functional(&r, FRAC, 100.0), 0.0);
    }

    #[test]
    fn test_uniform_population_guesses_in_range() {
        let r = rates(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        let c = causal(&r, FRAC, 100.0);
        let f = functional(&r, FRAC, 100.0);
        assert!(c > 0.0 && c < 50.0);
        assert!(f > 0.0 && f < 50.0);
        assert!(c.is_finite() && f.is_finite());
    }
}
