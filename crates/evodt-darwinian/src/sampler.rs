//! Weighted-proportional sampling over a fixed set of entries
//!
//! Entries are stored with their running cumulative weight. A draw `u * total`
//! selects the first entry whose cumulative weight strictly exceeds it, so an
//! entry is chosen with probability `weight / total`.

use evodt_common::{ConfigError, Result, SamplingError};
use rand::Rng;

/// Proportional sampler over `(weight, value)` entries
#[derive(Debug, Clone)]
pub struct WeightedSampler<T> {
    /// Strictly increasing cumulative weights
    cumulative: Vec<f64>,
    values: Vec<T>,
    total: f64,
}

impl<T> WeightedSampler<T> {
    /// Build a sampler, rejecting negative or non-finite weights.
    ///
    /// Zero-weight entries are accepted but can never be drawn.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, T)>,
    {
        let entries = entries.into_iter();
        let (lower, _) = entries.size_hint();
        let mut cumulative = Vec::with_capacity(lower);
        let mut values = Vec::with_capacity(lower);
        let mut total = 0.0;

        for (index, (weight, value)) in entries.enumerate() {
            if !weight.is_finite() {
                return Err(ConfigError::NonFiniteWeight { index }.into());
            }
            if weight < 0.0 {
                return Err(ConfigError::NegativeWeight { index, weight }.into());
            }
            if weight == 0.0 {
                continue;
            }
            total += weight;
            cumulative.push(total);
            values.push(value);
        }

        if !total.is_finite() {
            return Err(ConfigError::NonFiniteWeight {
                index: values.len(),
            }
            .into());
        }

        Ok(Self {
            cumulative,
            values,
            total,
        })
    }

    /// Draw one value, proportional to its weight
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T> {
        if self.values.is_empty() || self.total <= 0.0 {
            return Err(SamplingError::ZeroTotalWeight.into());
        }
        let draw = rng.gen::<f64>() * self.total;
        let index = self.cumulative.partition_point(|&c| c <= draw);
        // u * total can round up to total itself
        Ok(&self.values[index.min(self.values.len() - 1)])
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of drawable (positive-weight) entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evodt_common::rng::seeded;
    use evodt_common::EvodtError;
    use proptest::prelude::*;

    #[test]
    fn test_negative_weight_fails_fast() {
        let result = WeightedSampler::new(vec![(1.0, 'a'), (-0.5, 'b')]);
        assert!(matches!(
            result,
            Err(EvodtError::Config(ConfigError::NegativeWeight { index: 1, .. }))
        ));
    }

    #[test]
    fn test_nan_weight_rejected() {
        let result = WeightedSampler::new(vec![(f64::NAN, 0usize)]);
        assert!(matches!(
            result,
            Err(EvodtError::Config(ConfigError::NonFiniteWeight { index: 0 }))
        ));
    }

    #[test]
    fn test_zero_total_is_sampling_error() {
        let sampler = WeightedSampler::new(vec![(0.0, 1u8), (0.0, 2u8)]).unwrap();
        let mut rng = seeded(1);
        assert!(matches!(
            sampler.sample(&mut rng),
            Err(EvodtError::Sampling(SamplingError::ZeroTotalWeight))
        ));
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let sampler =
            WeightedSampler::new(vec![(0.0, 0usize), (2.0, 1), (0.0, 2), (1.0, 3), (0.0, 4)])
                .unwrap();
        assert_eq!(sampler.len(), 2);
        let mut rng = seeded(3);
        for _ in 0..5_000 {
            let v = *sampler.sample(&mut rng).unwrap();
            assert!(v == 1 || v == 3);
        }
    }

    #[test]
    fn test_frequencies_match_weights() {
        let weights = [1.0, 3.0, 0.0, 6.0];
        let sampler = WeightedSampler::new(weights.iter().copied().zip(0usize..)).unwrap();
        let mut rng = seeded(42);
        let draws = 20_000;
        let mut hits = [0usize; 4];
        for _ in 0..draws {
            hits[*sampler.sample(&mut rng).unwrap()] += 1;
        }
        let total: f64 = weights.iter().sum();
        for (i, w) in weights.iter().enumerate() {
            let freq = hits[i] as f64 / draws as f64;
            assert!((freq - w / total).abs() < 0.02, "index {} freq {}", i, freq);
        }
        assert_eq!(hits[2], 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_empirical_frequencies_converge(
            weights in prop::collection::vec(0.0f64..10.0, 1..6),
            seed in any::<u64>(),
        ) {
            let total: f64 = weights.iter().sum();
            prop_assume!(total > 0.1);

            let sampler = WeightedSampler::new(weights.iter().copied().zip(0usize..)).unwrap();
            let mut rng = seeded(seed);
            let draws = 10_000;
            let mut hits = vec![0usize; weights.len()];
            for _ in 0..draws {
                hits[*sampler.sample(&mut rng).unwrap()] += 1;
            }
            for (i, w) in weights.iter().enumerate() {
                let freq = hits[i] as f64 / draws as f64;
                prop_assert!((freq - w / total).abs() < 0.02);
                if *w == 0.0 {
                    prop_assert_eq!(hits[i], 0);
                }
            }
        }
    }
}
