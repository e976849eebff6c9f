//! Culling policy: draw victims by inverse utility, skipping extinct types

use evodt_common::{Result, SamplingError};
use rand::Rng;

use crate::population::Strategy;
use crate::sampler::WeightedSampler;

pub struct CullingPolicy {
    max_resample_attempts: usize,
}

impl CullingPolicy {
    pub fn new(max_resample_attempts: usize) -> Self {
        Self {
            max_resample_attempts,
        }
    }

    pub fn max_resample_attempts(&self) -> usize {
        self.max_resample_attempts
    }

    /// Pick one agent slot to die and return its strategy with the number of
    /// rejected draws. A draw is rejected when that strategy's running count
    /// has already reached zero.
    pub fn select_victim<T: Strategy, R: Rng + ?Sized>(
        &self,
        sampler: &WeightedSampler<usize>,
        agents: &[T],
        counts: &[usize],
        rng: &mut R,
    ) -> Result<(T, usize)> {
        for rejected in 0..self.max_resample_attempts {
            let victim = agents[*sampler.sample(rng)?];
            if counts[victim.index()] > 0 {
                return Ok((victim, rejected));
            }
        }
        Err(SamplingError::ResampleExhausted {
            purpose: "death",
            attempts: self.max_resample_attempts,
        }
        .into())
    }
}
