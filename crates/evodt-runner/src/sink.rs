//! Reporting sinks
//!
//! The simulation hands every generation's summary to [`ReportSink::record`]
//! and periodic ones to [`ReportSink::report`]. Sinks are fire-and-forget:
//! they take `&self`, return nothing, and must not block the generation loop.

use evodt_darwinian::Strategy;
use std::fmt::Debug;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::generation::GenerationSummary;

/// Receiver of generation summaries
pub trait ReportSink<T: Strategy, P>: Send + Sync {
    /// Periodic population report
    fn report(&self, summary: &GenerationSummary<T, P>);

    /// Called after every generation
    fn record(&self, _summary: &GenerationSummary<T, P>) {}
}

/// Whether `generation` is reported: the first one, then every `interval`th.
pub fn is_report_generation(generation: usize, interval: usize) -> bool {
    generation == 0 || (interval > 0 && (generation + 1) % interval == 0)
}

impl<T: Strategy, P> ReportSink<T, P> for Vec<Box<dyn ReportSink<T, P>>> {
    fn report(&self, summary: &GenerationSummary<T, P>) {
        for sink in self {
            sink.report(summary);
        }
    }

    fn record(&self, summary: &GenerationSummary<T, P>) {
        for sink in self {
            sink.record(summary);
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<T: Strategy, P> ReportSink<T, P> for NullSink {
    fn report(&self, _summary: &GenerationSummary<T, P>) {}
}

/// Logs the population report through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl<T: Strategy, P: Debug> ReportSink<T, P> for TracingSink {
    fn report(&self, summary: &GenerationSummary<T, P>) {
        info!(
            generation = summary.generation,
            rates = %summary.rates,
            params = ?summary.params,
            converged = summary.converged,
            "population report"
        );
    }
}

/// Forwards reports over an unbounded tokio channel
pub struct ChannelSink<T: Strategy, P> {
    sender: mpsc::UnboundedSender<GenerationSummary<T, P>>,
}

impl<T: Strategy, P: Clone + Send> ChannelSink<T, P> {
    /// Create a sink and the receiver draining it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<GenerationSummary<T, P>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl<T: Strategy, P: Clone + Send> ReportSink<T, P> for ChannelSink<T, P> {
    fn report(&self, summary: &GenerationSummary<T, P>) {
        if self.sender.send(summary.clone()).is_err() {
            debug!(generation = summary.generation, "report receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evodt_darwinian::{PopulationRates, RepopulationReport};
    use evodt_games::Player;
    use proptest::prelude::{prop_assert_eq, proptest};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn summary(generation: usize) -> GenerationSummary<Player, u32> {
        GenerationSummary {
            generation,
            rates: PopulationRates::uniform(),
            params: 7,
            converged: true,
            next_rates: PopulationRates::uniform(),
            repopulation: RepopulationReport::default(),
        }
    }

    #[derive(Default)]
    struct Counting {
        reports: AtomicUsize,
        records: AtomicUsize,
    }

    impl ReportSink<Player, u32> for Arc<Counting> {
        fn report(&self, _summary: &GenerationSummary<Player, u32>) {
            self.reports.fetch_add(1, Ordering::SeqCst);
        }

        fn record(&self, _summary: &GenerationSummary<Player, u32>) {
            self.records.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_report_cadence() {
        let reported: Vec<usize> = (0..1000)
            .filter(|&g| is_report_generation(g, 100))
            .collect();
        assert_eq!(reported.len(), 11);
        assert_eq!(reported[0], 0);
        assert_eq!(reported[1], 99);
        assert_eq!(reported[10], 999);
    }

    #[test]
    fn test_every_generation_reported_at_interval_one() {
        assert!((0..20).all(|g| is_report_generation(g, 1)));
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let sinks: Vec<Box<dyn ReportSink<Player, u32>>> =
            vec![Box::new(a.clone()), Box::new(b.clone()), Box::new(NullSink)];

        sinks.record(&summary(0));
        sinks.report(&summary(0));
        sinks.record(&summary(1));

        for sink in [&a, &b] {
            assert_eq!(sink.reports.load(Ordering::SeqCst), 1);
            assert_eq!(sink.records.load(Ordering::SeqCst), 2);
        }
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_reports() {
        let (sink, mut rx) = ChannelSink::<Player, u32>::channel();
        sink.report(&summary(0));
        sink.report(&summary(99));
        drop(sink);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.generation, 0);
        assert_eq!(second.generation, 99);
        assert_eq!(second.params, 7);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::<Player, u32>::channel();
        drop(rx);
        sink.report(&summary(0));
    }

    proptest! {
        #[test]
        fn prop_report_count_matches_interval(generations in 1usize..500, interval in 1usize..50) {
            let reported = (0..generations)
                .filter(|&g| is_report_generation(g, interval))
                .count();
            // generation 0 is reported even when it does not close an interval
            let closing = generations / interval;
            let expected = if interval == 1 { closing } else { closing + 1 };
            prop_assert_eq!(reported, expected);
        }
    }
}
