//! Lazy, restartable generation loop
//!
//! A [`Simulation`] owns one population, one engine, and one seeded RNG.
//! Iterating it yields one summary per generation until the configured
//! generation count is reached. The first error ends the sequence.

use std::iter::FusedIterator;

use chrono::Utc;
use evodt_common::rng::{self, SimRng};
use evodt_common::Result;
use evodt_darwinian::{EvolutionEngine, PopulationState};
use evodt_games::Game;
use rand::Rng;
use tracing::{error, info};
use uuid::Uuid;

use crate::generation::{run_generation, SummaryOf};
use crate::outcome::RunOutcome;
use crate::sink::{is_report_generation, ReportSink};

/// Build a game's initial population
pub fn initialize<G: Game, R: Rng + ?Sized>(
    game: &G,
    rng: &mut R,
) -> Result<PopulationState<G::Agent>> {
    PopulationState::initialize(
        game.initial_rates(),
        game.simulation().population_size,
        rng,
    )
}

pub struct Simulation<'g, G: Game> {
    game: &'g G,
    engine: EvolutionEngine,
    seed: u64,
    rng: SimRng,
    state: PopulationState<G::Agent>,
    generation: usize,
    failed: bool,
}

impl<'g, G: Game> Simulation<'g, G> {
    /// Prepare a run. `seed` overrides the configured seed; with neither, one
    /// is drawn from entropy and kept so the run can be replayed.
    pub fn new(game: &'g G, seed: Option<u64>) -> Result<Self> {
        let config = game.simulation();
        config.validate()?;

        let (seed, mut rng) = rng::resolve(seed.or(config.seed));
        let state = initialize(game, &mut rng)?;
        Ok(Self {
            game,
            engine: EvolutionEngine::from_config(config),
            seed,
            rng,
            state,
            generation: 0,
            failed: false,
        })
    }

    /// Rewind to generation 0 with the stored seed
    pub fn restart(&mut self) -> Result<()> {
        self.rng = rng::seeded(self.seed);
        self.state = initialize(self.game, &mut self.rng)?;
        self.generation = 0;
        self.failed = false;
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn game(&self) -> &G {
        self.game
    }

    /// Generations completed so far
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Population entering the next generation
    pub fn state(&self) -> &PopulationState<G::Agent> {
        &self.state
    }

    pub fn remaining(&self) -> usize {
        if self.failed {
            return 0;
        }
        self.game
            .simulation()
            .generations
            .saturating_sub(self.generation)
    }

    /// Drive the remaining generations, feeding every summary to `sink`
    pub fn run<S>(&mut self, sink: &S) -> Result<RunOutcome<G::Agent>>
    where
        S: ReportSink<G::Agent, G::Params> + ?Sized,
    {
        let started_at = Utc::now();
        let interval = self.game.simulation().report_interval;
        let mut unconverged = 0;

        info!(
            game = self.game.name(),
            seed = self.seed,
            generations = self.remaining(),
            population = self.state.len(),
            "starting run"
        );

        while let Some(summary) = self.next() {
            let summary = summary?;
            if !summary.converged {
                unconverged += 1;
            }
            sink.record(&summary);
            if is_report_generation(summary.generation, interval) {
                sink.report(&summary);
            }
        }

        let outcome = RunOutcome {
            run_id: Uuid::now_v7(),
            game: self.game.name(),
            seed: self.seed,
            started_at,
            finished_at: Utc::now(),
            generations: self.generation,
            unconverged_generations: unconverged,
            final_rates: self.state.rates().clone(),
        };
        info!(
            run_id = %outcome.run_id,
            rates = %outcome.final_rates,
            elapsed_ms = outcome.duration().num_milliseconds(),
            "run complete"
        );
        Ok(outcome)
    }
}

impl<'g, G: Game> Iterator for Simulation<'g, G> {
    type Item = Result<SummaryOf<G>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }
        match run_generation(
            self.game,
            &self.engine,
            &self.state,
            self.generation,
            &mut self.rng,
        ) {
            Ok((next, summary)) => {
                self.state = next;
                self.generation += 1;
                Some(Ok(summary))
            }
            Err(e) => {
                error!(generation = self.generation, error = %e, "generation failed");
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl<'g, G: Game> FusedIterator for Simulation<'g, G> {}
