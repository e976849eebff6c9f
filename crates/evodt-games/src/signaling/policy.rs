//! FDT policy synthesis
//!
//! A Functional agent maps the signal it receives about its opponent to an
//! action. The expected payoff of each action given a signal depends on the
//! posterior over the opponent's true type and, when the opponent is also
//! Functional, on the policy itself. The synthesizer starts from all-defect
//! and repeatedly best-responds to its own candidate until it stops changing
//! or the pass limit is reached.

use evodt_common::{DilemmaPayoffs, MAX_POLICY_PASSES};
use evodt_darwinian::{PopulationRates, Strategy};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::{Action, Player};

const DEFECTOR: usize = 0;
const COOPERATOR: usize = 1;
const FUNCTIONAL: usize = 2;

/// Action chosen for each possible signal, indexed by the signalled type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdtPolicy([Action; 3]);

impl FdtPolicy {
    pub const ALL_DEFECT: FdtPolicy = FdtPolicy([Action::Defect; 3]);

    pub fn new(actions: [Action; 3]) -> Self {
        Self(actions)
    }

    /// Action taken on receiving `signal`
    pub fn action(&self, signal: Player) -> Action {
        self.0[signal.index()]
    }

    pub fn actions(&self) -> [Action; 3] {
        self.0
    }
}

impl Serialize for FdtPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        for signal in Player::ALL {
            map.serialize_entry(signal.label(), &self.action(*signal))?;
        }
        map.end()
    }
}

impl std::fmt::Display for FdtPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for action in self.0 {
            f.write_str(match action {
                Action::Cooperate => "c",
                Action::Defect => "d",
            })?;
        }
        Ok(())
    }
}

/// Whether refinement reached a fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvergenceStatus {
    /// The candidate was its own best response after `passes` passes
    Converged { passes: usize },
    /// Still changing after `passes` passes; the last candidate is returned
    NotConverged { passes: usize },
}

impl ConvergenceStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceStatus::Converged { .. })
    }

    pub fn passes(&self) -> usize {
        match *self {
            ConvergenceStatus::Converged { passes } | ConvergenceStatus::NotConverged { passes } => {
                passes
            }
        }
    }
}

/// Result of one synthesis
#[derive(Debug, Clone, Serialize)]
pub struct PolicySynthesis {
    pub policy: FdtPolicy,
    #[serde(flatten)]
    pub status: ConvergenceStatus,
}

/// Expected payoff of cooperating and defecting for each signal
#[derive(Debug, Clone, Copy, Default)]
struct Expectations {
    cooperate: [f64; 3],
    defect: [f64; 3],
}

impl Expectations {
    fn best_response(&self) -> FdtPolicy {
        let mut actions = [Action::Defect; 3];
        for (signal, action) in actions.iter_mut().enumerate() {
            if self.cooperate[signal] > self.defect[signal] {
                *action = Action::Cooperate;
            }
        }
        FdtPolicy(actions)
    }
}

pub struct FdtPolicySynthesizer {
    accuracy: f64,
    payoffs: DilemmaPayoffs,
    max_passes: usize,
}

impl FdtPolicySynthesizer {
    pub fn new(accuracy: f64, payoffs: DilemmaPayoffs) -> Self {
        Self {
            accuracy,
            payoffs,
            max_passes: MAX_POLICY_PASSES,
        }
    }

    /// Posterior over the opponent's true type given `signal`.
    ///
    /// The likelihood is `accuracy` for the signalled type and
    /// `(1 − accuracy) / 2` for each other type. A signal with zero
    /// probability under the prior leaves the prior unchanged.
    pub fn posterior(&self, rates: &PopulationRates<Player>, signal: Player) -> [f64; 3] {
        let p = self.accuracy;
        let mut likelihood = [(1.0 - p) / 2.0; 3];
        likelihood[signal.index()] = p;

        let mut posterior = [0.0; 3];
        for (i, (_, rate)) in rates.iter().enumerate() {
            posterior[i] = likelihood[i] * rate;
        }
        let evidence: f64 = posterior.iter().sum();
        if evidence <= 0.0 {
            let mut prior = [0.0; 3];
            prior.copy_from_slice(rates.as_slice());
            return prior;
        }
        for value in posterior.iter_mut() {
            *value /= evidence;
        }
        posterior
    }

    /// Derive the generation's policy from the current rates
    pub fn synthesize(&self, rates: &PopulationRates<Player>) -> PolicySynthesis {
        let posteriors = [
            self.posterior(rates, Player::Defector),
            self.posterior(rates, Player::Cooperator),
            self.posterior(rates, Player::Functional),
        ];
        let baseline = self.baseline(&posteriors);

        let mut candidate = FdtPolicy::ALL_DEFECT;
        for pass in 1..=self.max_passes {
            let next = self.refine(&baseline, &posteriors, candidate).best_response();
            if next == candidate {
                debug!(policy = %candidate, passes = pass, "FDT policy converged");
                return PolicySynthesis {
                    policy: candidate,
                    status: ConvergenceStatus::Converged { passes: pass },
                };
            }
            candidate = next;
        }

        debug!(
            policy = %candidate,
            passes = self.max_passes,
            "FDT policy did not reach a fixed point"
        );
        PolicySynthesis {
            policy: candidate,
            status: ConvergenceStatus::NotConverged {
                passes: self.max_passes,
            },
        }
    }

    /// Expected payoffs against Defectors, Cooperators, and Functional
    /// opponents whose signal about us matches ours.
    fn baseline(&self, posteriors: &[[f64; 3]; 3]) -> Expectations {
        let DilemmaPayoffs {
            loss,
            defect,
            cooperate,
            win,
        } = self.payoffs;
        let p = self.accuracy;
        let stray = (1.0 - p) / 2.0;

        let mut eu = Expectations::default();
        for (signal, posterior) in posteriors.iter().enumerate() {
            eu.cooperate[signal] += posterior[DEFECTOR] * loss;
            eu.cooperate[signal] += posterior[COOPERATOR] * cooperate;
            eu.defect[signal] += posterior[DEFECTOR] * defect;
            eu.defect[signal] += posterior[COOPERATOR] * win;
        }
        for signal in [DEFECTOR, COOPERATOR] {
            let functional = posteriors[signal][FUNCTIONAL];
            eu.cooperate[signal] += functional * stray * cooperate;
            eu.defect[signal] += functional * stray * defect;
        }
        let functional = posteriors[FUNCTIONAL][FUNCTIONAL];
        eu.cooperate[FUNCTIONAL] += functional * p * cooperate;
        eu.defect[FUNCTIONAL] += functional * p * defect;
        eu
    }

    /// Add the Functional-vs-Functional terms that depend on the candidate
    fn refine(
        &self,
        baseline: &Expectations,
        posteriors: &[[f64; 3]; 3],
        candidate: FdtPolicy,
    ) -> Expectations {
        let DilemmaPayoffs {
            loss,
            defect,
            cooperate,
            win,
        } = self.payoffs;
        let p = self.accuracy;
        let stray = (1.0 - p) / 2.0;
        let [on_defector, on_cooperator, on_functional] = candidate.0;

        // Our payoffs when the opponent plays `theirs`
        let if_cooperate = |theirs: Action| match theirs {
            Action::Cooperate => cooperate,
            Action::Defect => loss,
        };
        let if_defect = |theirs: Action| match theirs {
            Action::Cooperate => win,
            Action::Defect => defect,
        };

        let mut eu = *baseline;

        let f = posteriors[FUNCTIONAL][FUNCTIONAL];
        if on_defector == on_cooperator {
            eu.cooperate[FUNCTIONAL] += f * (1.0 - p) * if_cooperate(on_defector);
            eu.defect[FUNCTIONAL] += f * (1.0 - p) * if_defect(on_defector);
        } else {
            eu.cooperate[FUNCTIONAL] += f * stray * (cooperate + loss);
            eu.defect[FUNCTIONAL] += f * stray * (win + defect);
        }

        let f = posteriors[COOPERATOR][FUNCTIONAL];
        if on_defector == on_functional {
            eu.cooperate[COOPERATOR] += f * (1.0 + p) * if_cooperate(on_defector);
            eu.defect[COOPERATOR] += f * (1.0 + p) * if_defect(on_defector);
        } else {
            eu.cooperate[COOPERATOR] += f * stray * if_cooperate(on_defector);
            eu.cooperate[COOPERATOR] += f * p * if_cooperate(on_functional);
            eu.defect[COOPERATOR] += f * stray * if_defect(on_defector);
            eu.defect[COOPERATOR] += f * p * if_defect(on_functional);
        }

        let f = posteriors[DEFECTOR][FUNCTIONAL];
        if on_cooperator == on_functional {
            eu.cooperate[DEFECTOR] += f * (1.0 + p) * if_cooperate(on_cooperator);
            eu.defect[DEFECTOR] += f * (1.0 + p) * if_defect(on_cooperator);
        } else {
            eu.cooperate[DEFECTOR] += f * stray * if_cooperate(on_cooperator);
            eu.cooperate[DEFECTOR] += f * p * if_cooperate(on_functional);
            eu.defect[DEFECTOR] += f * stray * if_defect(on_cooperator);
            eu.defect[DEFECTOR] += f * p * if_defect(on_functional);
        }

        eu
    }
}
