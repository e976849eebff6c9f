//! One generation: derive parameters, play rounds, repopulate

use evodt_common::Result;
use evodt_darwinian::{
    EvolutionEngine, PopulationRates, PopulationState, RepopulationReport, Strategy,
};
use evodt_games::Game;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument};

/// What happened in one generation
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "T: Strategy, P: Serialize"))]
pub struct GenerationSummary<T: Strategy, P> {
    /// Zero-based generation index
    pub generation: usize,
    /// Rates the generation was played with
    pub rates: PopulationRates<T>,
    /// Parameters derived from `rates`
    pub params: P,
    /// False when an iterative solver gave up on `params`
    pub converged: bool,
    /// Rates realized for the next generation
    pub next_rates: PopulationRates<T>,
    pub repopulation: RepopulationReport,
}

/// Summary type produced by a game's generation loop
pub type SummaryOf<G> = GenerationSummary<<G as Game>::Agent, <G as Game>::Params>;

/// Run a single generation and return the next population with its summary.
///
/// Utilities start at zero, accumulate over `rounds` calls to
/// [`Game::play_round`], and are consumed by repopulation.
#[instrument(skip(game, engine, state, rng), fields(game = game.name()))]
pub fn run_generation<G: Game, R: Rng + ?Sized>(
    game: &G,
    engine: &EvolutionEngine,
    state: &PopulationState<G::Agent>,
    generation: usize,
    rng: &mut R,
) -> Result<(PopulationState<G::Agent>, SummaryOf<G>)> {
    let params = game.parameters(state.rates());
    let converged = game.converged(&params);

    let mut utilities = vec![0.0; state.len()];
    for _ in 0..game.simulation().rounds {
        game.play_round(state, &params, &mut utilities, rng);
    }

    let (next, repopulation) = engine.repopulate(state, &utilities, rng)?;
    debug!(rates = %next.rates(), "generation complete");

    let summary = GenerationSummary {
        generation,
        rates: state.rates().clone(),
        params,
        converged,
        next_rates: next.rates().clone(),
        repopulation,
    };
    Ok((next, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evodt_common::rng::seeded;
    use evodt_common::{PredictorConfig, SignalingConfig, SimulationConfig};
    use evodt_games::{Decider, PredictorGame, SignalingGame};

    fn small(population_size: usize) -> SimulationConfig {
        SimulationConfig {
            population_size,
            generations: 5,
            rounds: 10,
            death_rate: 0.05,
            mutation_rate: 0.01,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_generation_preserves_population_size() {
        let game = SignalingGame::new(SignalingConfig {
            simulation: small(100),
            ..SignalingConfig::default()
        })
        .unwrap();
        let engine = EvolutionEngine::from_config(game.simulation());
        let mut rng = seeded(31);
        let state = PopulationState::initialize(game.initial_rates(), 100, &mut rng).unwrap();

        let (next, summary) = run_generation(&game, &engine, &state, 0, &mut rng).unwrap();
        assert_eq!(next.len(), 100);
        assert_eq!(next.counts().iter().sum::<usize>(), 100);
        assert_eq!(summary.generation, 0);
        assert_eq!(&summary.rates, state.rates());
        assert_eq!(&summary.next_rates, next.rates());
        assert_eq!(summary.repopulation.births.iter().sum::<usize>(), 5);
        assert!(summary.converged);
    }

    #[test]
    fn test_functional_deciders_take_over() {
        let game = PredictorGame::new(PredictorConfig {
            simulation: small(200),
            initial_rates: vec![0.5, 0.5],
            ..PredictorConfig::default()
        })
        .unwrap();
        let engine = EvolutionEngine::from_config(game.simulation());
        let mut rng = seeded(32);
        let mut state =
            PopulationState::initialize(game.initial_rates(), 200, &mut rng).unwrap();
        let start = state.count(Decider::Functional);
        for generation in 0..10 {
            let (next, _) = run_generation(&game, &engine, &state, generation, &mut rng).unwrap();
            state = next;
        }
        assert!(state.count(Decider::Functional) > start);
    }

    #[test]
    fn test_summary_serializes() {
        let game = SignalingGame::new(SignalingConfig {
            simulation: small(40),
            ..SignalingConfig::default()
        })
        .unwrap();
        let engine = EvolutionEngine::from_config(game.simulation());
        let mut rng = seeded(33);
        let state = PopulationState::initialize(game.initial_rates(), 40, &mut rng).unwrap();
        let (_, summary) = run_generation(&game, &engine, &state, 3, &mut rng).unwrap();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["generation"], 3);
        assert!(json["rates"]["functional"].is_number());
        assert!(json["params"]["policy"]["defector"].is_string());
        assert!(json["params"]["status"].is_string());
    }
}
