//! Prisoner's Dilemma with noisy type signals
//!
//! Each round the population is shuffled and split into pairs. Defectors
//! always defect and Cooperators always cooperate. Functional agents see a
//! noisy signal of their opponent's type and follow the generation's
//! [`FdtPolicy`].

pub mod policy;
pub mod signal;

use evodt_common::{DilemmaPayoffs, Result, SignalingConfig, SimulationConfig};
use evodt_darwinian::{PopulationRates, PopulationState, Strategy};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Game;

pub use policy::{ConvergenceStatus, FdtPolicy, FdtPolicySynthesizer, PolicySynthesis};
pub use signal::receive_signal;

/// Strategies in the dilemma. The canonical index doubles as the signal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Defector,
    Cooperator,
    Functional,
}

impl Strategy for Player {
    const ALL: &'static [Self] = &[Player::Defector, Player::Cooperator, Player::Functional];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Player::Defector => "defector",
            Player::Cooperator => "cooperator",
            Player::Functional => "functional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Cooperate,
    Defect,
}

/// Payoffs `(first, second)` for one encounter
pub fn payoffs(first: Action, second: Action, table: &DilemmaPayoffs) -> (f64, f64) {
    match (first, second) {
        (Action::Cooperate, Action::Cooperate) => (table.cooperate, table.cooperate),
        (Action::Defect, Action::Defect) => (table.defect, table.defect),
        (Action::Cooperate, Action::Defect) => (table.loss, table.win),
        (Action::Defect, Action::Cooperate) => (table.win, table.loss),
    }
}

pub struct SignalingGame {
    config: SignalingConfig,
    synthesizer: FdtPolicySynthesizer,
}

impl SignalingGame {
    pub fn new(config: SignalingConfig) -> Result<Self> {
        config.validate()?;
        PopulationRates::<Player>::new(config.initial_rates.clone())?;
        let synthesizer = FdtPolicySynthesizer::new(config.accuracy, config.payoffs);
        Ok(Self {
            config,
            synthesizer,
        })
    }

    pub fn config(&self) -> &SignalingConfig {
        &self.config
    }

    pub fn synthesizer(&self) -> &FdtPolicySynthesizer {
        &self.synthesizer
    }

    /// Action `agent` takes against `opponent`
    pub fn act<R: Rng + ?Sized>(
        &self,
        agent: Player,
        opponent: Player,
        policy: &FdtPolicy,
        rng: &mut R,
    ) -> Action {
        match agent {
            Player::Defector => Action::Defect,
            Player::Cooperator => Action::Cooperate,
            Player::Functional => {
                policy.action(receive_signal(opponent, self.config.accuracy, rng))
            }
        }
    }
}

impl Game for SignalingGame {
    type Agent = Player;
    type Params = PolicySynthesis;

    fn name(&self) -> &'static str {
        "signaling"
    }

    fn simulation(&self) -> &SimulationConfig {
        &self.config.simulation
    }

    fn initial_rates(&self) -> &[f64] {
        &self.config.initial_rates
    }

    fn parameters(&self, rates: &PopulationRates<Player>) -> PolicySynthesis {
        let synthesis = self.synthesizer.synthesize(rates);
        if !synthesis.status.is_converged() {
            warn!(%rates, policy = %synthesis.policy, "using unconverged FDT policy");
        }
        synthesis
    }

    fn converged(&self, params: &PolicySynthesis) -> bool {
        params.status.is_converged()
    }

    fn play_round<R: Rng + ?Sized>(
        &self,
        population: &PopulationState<Player>,
        params: &PolicySynthesis,
        utilities: &mut [f64],
        rng: &mut R,
    ) {
        let agents = population.agents();
        let mut order: Vec<usize> = (0..agents.len()).collect();
        order.shuffle(rng);

        for pair in order.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            let action_a = self.act(agents[a], agents[b], &params.policy, rng);
            let action_b = self.act(agents[b], agents[a], &params.policy, rng);
            let (pay_a, pay_b) = payoffs(action_a, action_b, &self.config.payoffs);
            utilities[a] += pay_a;
            utilities[b] += pay_b;
        }
    }
}
