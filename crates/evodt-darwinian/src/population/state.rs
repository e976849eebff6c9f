//! Concrete population of agent tags and its realized rates

use evodt_common::{ConfigError, Result};
use rand::Rng;
use serde::Serialize;

use super::{PopulationRates, Strategy};

/// A fixed-size population of strategy tags.
///
/// `counts` and `rates` are always derived from `agents`; the only way to
/// build a full population from a rate vector is [`PopulationState::realize`].
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = ""))]
pub struct PopulationState<T: Strategy> {
    #[serde(skip)]
    agents: Vec<T>,
    counts: Vec<usize>,
    rates: PopulationRates<T>,
}

impl<T: Strategy> PopulationState<T> {
    /// Realize target rates into exactly `size` agents.
    ///
    /// Each strategy first receives `floor(rate * size)` slots in canonical
    /// order. Slots left over from truncation are filled one at a time by a
    /// uniform draw classified against the cumulative target rates. The
    /// returned state carries the realized rates `count / size`, which may
    /// drift slightly from the requested ones.
    pub fn realize<R: Rng + ?Sized>(
        target: &PopulationRates<T>,
        size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if size == 0 {
            return Err(ConfigError::NonPositiveCount {
                name: "population_size",
            }
            .into());
        }

        let mut agents = Vec::with_capacity(size);
        let mut counts = vec![0usize; T::count()];

        for (strategy, rate) in target.iter() {
            let remaining = size - agents.len();
            let slots = ((rate * size as f64).floor() as usize).min(remaining);
            agents.extend(std::iter::repeat(strategy).take(slots));
            counts[strategy.index()] += slots;
        }

        while agents.len() < size {
            let strategy = classify(target, rng.gen::<f64>());
            agents.push(strategy);
            counts[strategy.index()] += 1;
        }

        let rates = PopulationRates::from_counts(&counts, size);
        Ok(Self {
            agents,
            counts,
            rates,
        })
    }

    /// Build the initial population for a run
    pub fn initialize<R: Rng + ?Sized>(
        initial_rates: &[f64],
        size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let target = PopulationRates::new(initial_rates.to_vec())?;
        Self::realize(&target, size, rng)
    }

    pub fn agents(&self) -> &[T] {
        &self.agents
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn count(&self, strategy: T) -> usize {
        self.counts[strategy.index()]
    }

    pub fn rates(&self) -> &PopulationRates<T> {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Bucket a uniform draw against cumulative rates; the last strategy takes
/// whatever mass remains.
fn classify<T: Strategy>(target: &PopulationRates<T>, draw: f64) -> T {
    let mut cumulative = 0.0;
    let last = T::ALL.len() - 1;
    for (i, (strategy, rate)) in target.iter().enumerate() {
        cumulative += rate;
        if i == last || draw < cumulative {
            return strategy;
        }
    }
    T::ALL[last]
}
