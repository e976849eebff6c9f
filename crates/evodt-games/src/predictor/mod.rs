//! Transparent Newcomb problem
//!
//! A predictor fills the opaque box with `high` only if it predicts the agent
//! will take that box alone; the transparent box always holds `low`. The
//! prediction is right with probability `accuracy`.

use evodt_common::{PredictorConfig, PredictorPayoffs, Result, SimulationConfig};
use evodt_darwinian::{PopulationRates, PopulationState, Strategy};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Game;

/// Strategies facing the predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decider {
    /// Always takes both boxes once they are filled
    Causal,
    /// Chooses the policy with the higher expected payoff under the predictor
    Functional,
}

impl Strategy for Decider {
    const ALL: &'static [Self] = &[Decider::Causal, Decider::Functional];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Decider::Causal => "causal",
            Decider::Functional => "functional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxChoice {
    OneBox,
    TwoBox,
}

impl BoxChoice {
    pub fn opposite(self) -> Self {
        match self {
            BoxChoice::OneBox => BoxChoice::TwoBox,
            BoxChoice::TwoBox => BoxChoice::OneBox,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictorParams {
    /// What Functional agents do when the opaque box is full
    pub functional_choice: BoxChoice,
}

/// Functional choice: one-box iff `P·high + (1−P)·low > (1−P)·(high+low) + P·low`
pub fn functional_choice(accuracy: f64, payoffs: &PredictorPayoffs) -> BoxChoice {
    let one_box = accuracy * payoffs.high + (1.0 - accuracy) * payoffs.low;
    let two_box = (1.0 - accuracy) * (payoffs.high + payoffs.low) + accuracy * payoffs.low;
    if one_box > two_box {
        BoxChoice::OneBox
    } else {
        BoxChoice::TwoBox
    }
}

pub struct PredictorGame {
    config: PredictorConfig,
}

impl PredictorGame {
    pub fn new(config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        PopulationRates::<Decider>::new(config.initial_rates.clone())?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Draw the predictor's guess about one agent
    pub fn predict<R: Rng + ?Sized>(
        &self,
        agent: Decider,
        params: &PredictorParams,
        rng: &mut R,
    ) -> BoxChoice {
        let actual = match agent {
            Decider::Causal => BoxChoice::TwoBox,
            Decider::Functional => params.functional_choice,
        };
        if rng.gen::<f64>() < self.config.accuracy {
            actual
        } else {
            actual.opposite()
        }
    }

    /// Payoff given the prediction and the agent's own behavior
    pub fn payoff(&self, agent: Decider, prediction: BoxChoice, params: &PredictorParams) -> f64 {
        let PredictorPayoffs { high, low } = self.config.payoffs;
        if prediction == BoxChoice::TwoBox {
            return low;
        }
        match agent {
            Decider::Causal => high + low,
            Decider::Functional => match params.functional_choice {
                BoxChoice::OneBox => high,
                BoxChoice::TwoBox => high + low,
            },
        }
    }
}

impl Game for PredictorGame {
    type Agent = Decider;
    type Params = PredictorParams;

    fn name(&self) -> &'static str {
        "predictor"
    }

    fn simulation(&self) -> &SimulationConfig {
        &self.config.simulation
    }

    fn initial_rates(&self) -> &[f64] {
        &self.config.initial_rates
    }

    fn parameters(&self, _rates: &PopulationRates<Decider>) -> PredictorParams {
        PredictorParams {
            functional_choice: functional_choice(self.config.accuracy, &self.config.payoffs),
        }
    }

    fn play_round<R: Rng + ?Sized>(
        &self,
        population: &PopulationState<Decider>,
        params: &PredictorParams,
        utilities: &mut [f64],
        rng: &mut R,
    ) {
        for (utility, &agent) in utilities.iter_mut().zip(population.agents()) {
            let prediction = self.predict(agent, params, rng);
            *utility += self.payoff(agent, prediction, params);
        }
    }
}
