//! Prometheus telemetry for a running simulation

use evodt_darwinian::Strategy;
use prometheus::{GaugeVec, IntCounter, IntGauge, Opts, Registry};

use crate::generation::GenerationSummary;
use crate::sink::ReportSink;

/// Prometheus metrics for the population
pub struct PopulationMetrics {
    pub population_rate: GaugeVec,
    pub generation: IntGauge,
    pub generations_total: IntCounter,
    pub unconverged_total: IntCounter,
    pub mutations_total: IntCounter,
    pub death_resamples_total: IntCounter,
    pub clamped_utilities_total: IntCounter,
}

impl PopulationMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            population_rate: GaugeVec::new(
                Opts::new(
                    "evodt_population_rate",
                    "Share of the population holding each strategy",
                ),
                &["strategy"],
            )?,
            generation: IntGauge::new("evodt_generation", "Last completed generation")?,
            generations_total: IntCounter::new(
                "evodt_generations_total",
                "Total generations simulated",
            )?,
            unconverged_total: IntCounter::new(
                "evodt_fdt_unconverged_total",
                "Generations played with a policy that did not reach a fixed point",
            )?,
            mutations_total: IntCounter::new(
                "evodt_mutations_total",
                "Total agents reassigned by mutation",
            )?,
            death_resamples_total: IntCounter::new(
                "evodt_death_resamples_total",
                "Death draws rejected because the drawn strategy was extinct",
            )?,
            clamped_utilities_total: IntCounter::new(
                "evodt_clamped_utilities_total",
                "Zero utilities clamped before inverse weighting",
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.population_rate.clone()))?;
        registry.register(Box::new(self.generation.clone()))?;
        registry.register(Box::new(self.generations_total.clone()))?;
        registry.register(Box::new(self.unconverged_total.clone()))?;
        registry.register(Box::new(self.mutations_total.clone()))?;
        registry.register(Box::new(self.death_resamples_total.clone()))?;
        registry.register(Box::new(self.clamped_utilities_total.clone()))?;
        Ok(())
    }
}

impl<T: Strategy, P> ReportSink<T, P> for PopulationMetrics {
    fn report(&self, _summary: &GenerationSummary<T, P>) {}

    fn record(&self, summary: &GenerationSummary<T, P>) {
        for (strategy, rate) in summary.next_rates.iter() {
            self.population_rate
                .with_label_values(&[strategy.label()])
                .set(rate);
        }
        self.generation.set(summary.generation as i64);
        self.generations_total.inc();
        if !summary.converged {
            self.unconverged_total.inc();
        }
        let report = &summary.repopulation;
        self.mutations_total.inc_by(report.mutations as u64);
        self.death_resamples_total.inc_by(report.death_resamples as u64);
        self.clamped_utilities_total.inc_by(report.clamped_utilities as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evodt_darwinian::{PopulationRates, RepopulationReport};
    use evodt_games::Guesser;

    fn summary(converged: bool) -> GenerationSummary<Guesser, ()> {
        GenerationSummary {
            generation: 4,
            rates: PopulationRates::uniform(),
            params: (),
            converged,
            next_rates: PopulationRates::new(vec![0.5, 0.25, 0.25]).unwrap(),
            repopulation: RepopulationReport {
                mutations: 3,
                death_resamples: 2,
                ..RepopulationReport::default()
            },
        }
    }

    #[test]
    fn test_record_updates_metrics() {
        let metrics = PopulationMetrics::new().unwrap();
        metrics.record(&summary(true));
        metrics.record(&summary(false));

        assert_eq!(metrics.generations_total.get(), 2);
        assert_eq!(metrics.unconverged_total.get(), 1);
        assert_eq!(metrics.mutations_total.get(), 6);
        assert_eq!(metrics.death_resamples_total.get(), 4);
        assert_eq!(metrics.generation.get(), 4);
        let causal = metrics.population_rate.with_label_values(&["causal"]).get();
        assert!((causal - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_register_exposes_families() {
        let registry = Registry::new();
        let metrics = PopulationMetrics::new().unwrap();
        metrics.register(&registry).unwrap();
        metrics.record(&summary(true));

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"evodt_population_rate".to_string()));
        assert!(names.contains(&"evodt_fdt_unconverged_total".to_string()));
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        let metrics = PopulationMetrics::new().unwrap();
        metrics.register(&registry).unwrap();
        assert!(metrics.register(&registry).is_err());
    }
}
