//! Keynesian beauty contest
//!
//! Every round all agents submit a guess and the target is `frac` times the
//! average guess. Random guessers draw uniformly from `[0, ceiling)`; Causal
//! and Functional guessers submit their closed-form best responses. Payoff is
//! `1 / |target - guess|`, capped at `utility_cap`.

pub mod best_response;

use evodt_common::{GuessingConfig, Result, SimulationConfig};
use evodt_darwinian::{PopulationRates, PopulationState, Strategy};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Game;

/// Strategies in the beauty contest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guesser {
    Causal,
    Random,
    Functional,
}

impl Strategy for Guesser {
    const ALL: &'static [Self] = &[Guesser::Causal, Guesser::Random, Guesser::Functional];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Guesser::Causal => "causal",
            Guesser::Random => "random",
            Guesser::Functional => "functional",
        }
    }
}

/// Guesses submitted by the deterministic strategies this generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestResponses {
    pub causal: f64,
    pub functional: f64,
}

pub struct GuessingGame {
    config: GuessingConfig,
}

impl GuessingGame {
    pub fn new(config: GuessingConfig) -> Result<Self> {
        config.validate()?;
        PopulationRates::<Guesser>::new(config.initial_rates.clone())?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GuessingConfig {
        &self.config
    }

    /// Payoff for a guess against the round's target
    pub fn payoff(&self, target: f64, guess: f64) -> f64 {
        let cap = self.config.utility_cap;
        let error = (target - guess).abs();
        if error == 0.0 || 1.0 / error > cap {
            return cap;
        }
        1.0 / error
    }
}

impl Game for GuessingGame {
    type Agent = Guesser;
    type Params = BestResponses;

    fn name(&self) -> &'static str {
        "guessing"
    }

    fn simulation(&self) -> &SimulationConfig {
        &self.config.simulation
    }

    fn initial_rates(&self) -> &[f64] {
        &self.config.initial_rates
    }

    fn parameters(&self, rates: &PopulationRates<Guesser>) -> BestResponses {
        let frac = self.config.frac;
        let ceiling = self.config.guess_ceiling;
        BestResponses {
            causal: best_response::causal(rates, frac, ceiling),
            functional: best_response::functional(rates, frac, ceiling),
        }
    }

    fn play_round<R: Rng + ?Sized>(
        &self,
        population: &PopulationState<Guesser>,
        params: &BestResponses,
        utilities: &mut [f64],
        rng: &mut R,
    ) {
        let ceiling = self.config.guess_ceiling;
        let guesses: Vec<f64> = population
            .agents()
            .iter()
            .map(|agent| match agent {
                Guesser::Causal => params.causal,
                Guesser::Random => rng.gen::<f64>() * ceiling,
                Guesser::Functional => params.functional,
            })
            .collect();

        let average = guesses.iter().sum::<f64>() / guesses.len() as f64;
        let target = self.config.frac * average;

        for (utility, guess) in utilities.iter_mut().zip(&guesses) {
            *utility += self.payoff(target, *guess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evodt_common::rng::seeded;
    use rand::rngs::mock::StepRng;

    fn game() -> GuessingGame {
        GuessingGame::new(GuessingConfig::default()).unwrap()
    }

    #[test]
    fn test_payoff_is_capped() {
        let g = game();
        assert_eq!(g.payoff(10.0, 10.0), 1_000.0);
        assert_eq!(g.payoff(10.0, 10.0005), 1_000.0);
        assert!((g.payoff(10.0, 12.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_population_is_rewarded_exactly() {
        let g = game();
        let mut rng = seeded(1);
        let target = PopulationRates::new(vec![1.0, 0.0, 0.0]).unwrap();
        let population = PopulationState::realize(&target, 50, &mut rng).unwrap();
        let params = g.parameters(population.rates());
        assert_eq!(params.causal, 0.0);

        let mut utilities = vec![0.0; 50];
        g.play_round(&population, &params, &mut utilities, &mut rng);
        // everyone guesses 0 and the target is 0
        assert!(utilities.iter().all(|&u| u == 1_000.0));
    }

    #[test]
    fn test_round_accumulates_positive_utilities() {
        let g = game();
        let mut rng = seeded(2);
        let population =
            PopulationState::realize(&PopulationRates::uniform(), 300, &mut rng).unwrap();
        let params = g.parameters(population.rates());
        let mut utilities = vec![0.0; 300];
        for _ in 0..5 {
            g.play_round(&population, &params, &mut utilities, &mut rng);
        }
        assert!(utilities.iter().all(|&u| u > 0.0 && u <= 5_000.0));
    }

    #[test]
    fn test_each_agent_scored_against_its_own_guess() {
        use Guesser::{Causal as C, Functional as F, Random as R};

        let g = game();
        let target = PopulationRates::new(vec![0.2, 0.6, 0.2]).unwrap();
        let population = PopulationState::realize(&target, 10, &mut seeded(3)).unwrap();
        assert_eq!(population.agents(), &[C, C, R, R, R, R, R, R, F, F]);

        let params = BestResponses {
            causal: 10.0,
            functional: 30.0,
        };
        // random draws alternate 0.25 and 0.75, so the guesses are 25 and 75
        let mut rng = StepRng::new(1 << 62, 1 << 63);
        let mut utilities = vec![0.0; 10];
        g.play_round(&population, &params, &mut utilities, &mut rng);

        // mean guess 38, target 76/3
        let expected = [
            3.0 / 46.0,
            3.0 / 46.0,
            3.0,
            3.0 / 149.0,
            3.0,
            3.0 / 149.0,
            3.0,
            3.0 / 149.0,
            3.0 / 14.0,
            3.0 / 14.0,
        ];
        for (got, want) in utilities.iter().zip(&expected) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }

        // the second round sees the same draws and doubles every score
        g.play_round(&population, &params, &mut utilities, &mut rng);
        for (got, want) in utilities.iter().zip(&expected) {
            assert!((got - 2.0 * want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bad_initial_rates_rejected() {
        let config = GuessingConfig {
            initial_rates: vec![0.5, 0.5],
            ..GuessingConfig::default()
        };
        assert!(GuessingGame::new(config).is_err());
    }
}
