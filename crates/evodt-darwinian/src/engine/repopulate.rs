//! Selection, mutation, and population rebuild

use evodt_common::{ConfigError, Result, SimulationConfig};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::mutation::mutate;
use crate::culling::CullingPolicy;
use crate::fitness::FitnessCalculator;
use crate::population::{PopulationRates, PopulationState, Strategy};
use crate::sampler::WeightedSampler;

/// What happened during one repopulation
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepopulationReport {
    /// Slots reassigned to a random strategy
    pub mutations: usize,
    /// Births per strategy, in canonical order
    pub births: Vec<usize>,
    /// Deaths per strategy, in canonical order
    pub deaths: Vec<usize>,
    /// Death draws rejected because the drawn strategy was already extinct
    pub death_resamples: usize,
    /// Agents whose zero utility was clamped before reciprocal weighting
    pub clamped_utilities: usize,
}

/// Applies mutation, utility-weighted birth, and inverse-utility death
pub struct EvolutionEngine {
    death_count: usize,
    mutation_count: usize,
    culling: CullingPolicy,
}

impl EvolutionEngine {
    pub fn new(death_count: usize, mutation_count: usize, max_resample_attempts: usize) -> Self {
        Self {
            death_count,
            mutation_count,
            culling: CullingPolicy::new(max_resample_attempts),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.death_count(),
            config.mutation_count(),
            config.max_resample_attempts,
        )
    }

    pub fn death_count(&self) -> usize {
        self.death_count
    }

    pub fn mutation_count(&self) -> usize {
        self.mutation_count
    }

    /// Produce the next generation from the current one and its utilities.
    ///
    /// Counts start from the current population. Mutation moves a few of them
    /// between strategies, births add `death_count` agents of strategies drawn
    /// in proportion to utility, and deaths remove `death_count` agents drawn
    /// in proportion to inverse utility. The resulting rates are realized into
    /// a fresh population, so slot identity is not carried across generations.
    #[instrument(skip_all, fields(population = state.len()))]
    pub fn repopulate<T: Strategy, R: Rng + ?Sized>(
        &self,
        state: &PopulationState<T>,
        utilities: &[f64],
        rng: &mut R,
    ) -> Result<(PopulationState<T>, RepopulationReport)> {
        let agents = state.agents();
        let size = agents.len();
        if utilities.len() != size {
            return Err(ConfigError::UtilityArity {
                expected: size,
                actual: utilities.len(),
            }
            .into());
        }

        let mut counts = state.counts().to_vec();
        let mut report = RepopulationReport {
            births: vec![0; T::count()],
            deaths: vec![0; T::count()],
            ..RepopulationReport::default()
        };

        report.mutations = mutate(agents, &mut counts, self.mutation_count, rng)?;

        // Births: more of whatever earned the most
        let births = WeightedSampler::new(
            utilities
                .iter()
                .enumerate()
                .map(|(slot, &u)| (FitnessCalculator::birth_weight(u), slot)),
        )?;
        for _ in 0..self.death_count {
            let born = agents[*births.sample(rng)?];
            counts[born.index()] += 1;
            report.births[born.index()] += 1;
        }

        // Deaths: fewer of whatever earned the least
        report.clamped_utilities = utilities
            .iter()
            .filter(|&&u| FitnessCalculator::is_degenerate(u))
            .count();
        let deaths = WeightedSampler::new(
            utilities
                .iter()
                .enumerate()
                .map(|(slot, &u)| (FitnessCalculator::death_weight(u), slot)),
        )?;
        for _ in 0..self.death_count {
            let (dead, rejected) = self.culling.select_victim(&deaths, agents, &counts, rng)?;
            counts[dead.index()] -= 1;
            report.deaths[dead.index()] += 1;
            report.death_resamples += rejected;
        }

        if report.clamped_utilities > 0 {
            warn!(
                clamped = report.clamped_utilities,
                "Zero utilities clamped for death weighting"
            );
        }
        debug!(
            mutations = report.mutations,
            births = ?report.births,
            deaths = ?report.deaths,
            resamples = report.death_resamples,
            "Repopulated"
        );

        let rates = PopulationRates::from_counts(&counts, size);
        let next = PopulationState::realize(&rates, size, rng)?;
        Ok((next, report))
    }
}
