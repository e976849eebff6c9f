//! Per-strategy population proportions

use std::marker::PhantomData;

use evodt_common::config::validate_rates;
use evodt_common::Result;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::Strategy;

/// Proportion of the population holding each strategy, indexed by
/// [`Strategy::index`]. Entries lie in `[0, 1]` and sum to 1.
#[derive(Debug)]
pub struct PopulationRates<T> {
    rates: Vec<f64>,
    _strategy: PhantomData<fn() -> T>,
}

impl<T> Clone for PopulationRates<T> {
    fn clone(&self) -> Self {
        Self {
            rates: self.rates.clone(),
            _strategy: PhantomData,
        }
    }
}

impl<T> PartialEq for PopulationRates<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rates == other.rates
    }
}

impl<T: Strategy> PopulationRates<T> {
    /// Validate and wrap a rate vector in canonical strategy order
    pub fn new(rates: Vec<f64>) -> Result<Self> {
        validate_rates(&rates, &T::labels())?;
        Ok(Self {
            rates,
            _strategy: PhantomData,
        })
    }

    /// Equal share for every strategy
    pub fn uniform() -> Self {
        let k = T::count();
        Self {
            rates: vec![1.0 / k as f64; k],
            _strategy: PhantomData,
        }
    }

    /// Realized proportions `count_i / total`
    pub(crate) fn from_counts(counts: &[usize], total: usize) -> Self {
        Self {
            rates: counts.iter().map(|&c| c as f64 / total as f64).collect(),
            _strategy: PhantomData,
        }
    }

    pub fn get(&self, strategy: T) -> f64 {
        self.rates[strategy.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.rates
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, f64)> + '_ {
        T::ALL.iter().copied().zip(self.rates.iter().copied())
    }
}

impl<T: Strategy> Serialize for PopulationRates<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rates.len()))?;
        for (strategy, rate) in self.iter() {
            map.serialize_entry(strategy.label(), &rate)?;
        }
        map.end()
    }
}

impl<T: Strategy> std::fmt::Display for PopulationRates<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (strategy, rate) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={:.4}", strategy.label(), rate)?;
            first = false;
        }
        Ok(())
    }
}
