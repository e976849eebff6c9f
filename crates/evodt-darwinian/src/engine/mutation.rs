//! Random type reassignment of a small subset of the population

use evodt_common::{Result, SamplingError};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::population::Strategy;

/// Reassign `mutation_count` distinct slots to uniformly random strategies.
///
/// Slots are visited in a uniform random permutation. A slot whose strategy
/// has no remaining count is skipped so no count can go negative. Only
/// `counts` changes; `agents` still records each slot's pre-mutation strategy.
pub fn mutate<T: Strategy, R: Rng + ?Sized>(
    agents: &[T],
    counts: &mut [usize],
    mutation_count: usize,
    rng: &mut R,
) -> Result<usize> {
    if mutation_count == 0 {
        return Ok(0);
    }

    let mut order: Vec<usize> = (0..agents.len()).collect();
    order.shuffle(rng);
    let mut slots = order.into_iter();

    for selected in 0..mutation_count {
        let old = loop {
            let slot = slots.next().ok_or(SamplingError::PermutationExhausted {
                selected,
                requested: mutation_count,
            })?;
            let strategy = agents[slot];
            if counts[strategy.index()] > 0 {
                break strategy;
            }
        };
        let mutant = T::ALL[rng.gen_range(0..T::count())];
        counts[old.index()] -= 1;
        counts[mutant.index()] += 1;
    }

    Ok(mutation_count)
}
