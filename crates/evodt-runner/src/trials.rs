//! Independent trials in parallel
//!
//! Each trial is a complete run with its own seed and RNG; nothing is
//! shared between them except the read-only game.

use evodt_common::Result;
use evodt_games::Game;
use rayon::prelude::*;
use tracing::info;

use crate::outcome::RunOutcome;
use crate::simulation::Simulation;
use crate::sink::NullSink;

/// Run one simulation per seed across the rayon pool.
///
/// Results come back in seed order; a failed trial does not stop the others.
pub fn run_trials<G: Game>(game: &G, seeds: &[u64]) -> Vec<Result<RunOutcome<G::Agent>>> {
    info!(game = game.name(), trials = seeds.len(), "running trials");
    seeds
        .par_iter()
        .map(|&seed| Simulation::new(game, Some(seed))?.run(&NullSink))
        .collect()
}
