//! Final record of a completed run

use chrono::{DateTime, Utc};
use evodt_darwinian::{PopulationRates, Strategy};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct RunOutcome<T: Strategy> {
    pub run_id: Uuid,
    pub game: &'static str,
    /// Seed that reproduces this run
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Generations completed
    pub generations: usize,
    /// Generations played with a parameter set that never stabilized
    pub unconverged_generations: usize,
    pub final_rates: PopulationRates<T>,
}

impl<T: Strategy> RunOutcome<T> {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Average final rates across runs, in canonical strategy order
pub fn mean_final_rates<T: Strategy>(outcomes: &[RunOutcome<T>]) -> Vec<f64> {
    let mut mean = vec![0.0; T::count()];
    if outcomes.is_empty() {
        return mean;
    }
    for outcome in outcomes {
        for (slot, rate) in mean.iter_mut().zip(outcome.final_rates.as_slice()) {
            *slot += rate;
        }
    }
    for slot in mean.iter_mut() {
        *slot /= outcomes.len() as f64;
    }
    mean
}
