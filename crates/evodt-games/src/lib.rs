//! # Games
//!
//! Payoff rules for the three arenas Evodt evolves strategies in.
//!
//! | Game | Strategies | Interaction |
//! |------|------------|-------------|
//! | [`GuessingGame`] | Causal, Random, Functional | everyone guesses ⅔ of the average guess |
//! | [`PredictorGame`] | Causal, Functional | each agent faces a noisy predictor alone |
//! | [`SignalingGame`] | Defector, Cooperator, Functional | random pairs play a Prisoner's Dilemma |
//!
//! A [`Game`] derives per-generation parameters from the current rates and
//! plays rounds that add each agent's payoff into a utility buffer.

pub mod guessing;
pub mod predictor;
pub mod signaling;

use std::fmt::Debug;

use evodt_common::SimulationConfig;
use evodt_darwinian::{PopulationRates, PopulationState, Strategy};
use rand::Rng;
use serde::Serialize;

pub use guessing::{BestResponses, Guesser, GuessingGame};
pub use predictor::{BoxChoice, Decider, PredictorGame, PredictorParams};
pub use signaling::{
    Action, ConvergenceStatus, FdtPolicy, FdtPolicySynthesizer, Player, PolicySynthesis,
    SignalingGame,
};

/// One evolutionary arena
pub trait Game: Send + Sync {
    /// Strategy tag for agents in this game
    type Agent: Strategy;

    /// Per-generation values derived from the population, e.g. a policy
    type Params: Clone + Debug + Serialize + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    /// Population dynamics for this game's runs
    fn simulation(&self) -> &SimulationConfig;

    /// Starting proportions in canonical strategy order
    fn initial_rates(&self) -> &[f64];

    /// Derive this generation's parameters from the current rates
    fn parameters(&self, rates: &PopulationRates<Self::Agent>) -> Self::Params;

    /// Whether `params` reached a stable value; only iterative solvers can fail to
    fn converged(&self, _params: &Self::Params) -> bool {
        true
    }

    /// Play one round, adding every agent's payoff to `utilities[slot]`
    fn play_round<R: Rng + ?Sized>(
        &self,
        population: &PopulationState<Self::Agent>,
        params: &Self::Params,
        utilities: &mut [f64],
        rng: &mut R,
    );
}
