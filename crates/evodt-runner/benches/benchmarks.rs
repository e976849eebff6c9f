//! Evodt Performance Benchmarks
//!
//! Hot paths of a run:
//! - Weighted sampling
//! - Population realization
//! - Repopulation
//! - FDT policy synthesis
//! - A full signaling generation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use evodt_common::rng::seeded;
use evodt_common::{DilemmaPayoffs, SignalingConfig, SimulationConfig};
use evodt_darwinian::{EvolutionEngine, PopulationRates, PopulationState, WeightedSampler};
use evodt_games::{FdtPolicySynthesizer, Game, Player, SignalingGame};
use evodt_runner::run_generation;

// ============ SAMPLING BENCHMARKS ============

fn bench_weighted_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");

    for size in [1_000usize, 10_000, 100_000].iter() {
        let weights: Vec<(f64, usize)> = (0..*size).map(|i| ((i % 97) as f64 + 1.0, i)).collect();

        group.bench_with_input(BenchmarkId::new("build", size), size, |b, _| {
            b.iter(|| WeightedSampler::new(black_box(weights.iter().copied())).unwrap());
        });

        let sampler = WeightedSampler::new(weights.iter().copied()).unwrap();
        let mut rng = seeded(1);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("sample", size), size, |b, _| {
            b.iter(|| *sampler.sample(&mut rng).unwrap());
        });
    }

    group.finish();
}

// ============ POPULATION BENCHMARKS ============

fn bench_realize(c: &mut Criterion) {
    let mut group = c.benchmark_group("population");
    let target = PopulationRates::<Player>::new(vec![0.2, 0.3, 0.5]).unwrap();
    let mut rng = seeded(2);

    for size in [1_000usize, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("realize", size), size, |b, &size| {
            b.iter(|| PopulationState::realize(black_box(&target), size, &mut rng).unwrap());
        });
    }

    group.finish();
}

fn bench_repopulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("repopulate");
    let mut rng = seeded(3);

    for size in [1_000usize, 10_000].iter() {
        let state =
            PopulationState::realize(&PopulationRates::<Player>::uniform(), *size, &mut rng)
                .unwrap();
        let utilities: Vec<f64> = (0..*size).map(|i| (i % 10) as f64 * 7.0).collect();
        let engine = EvolutionEngine::new(size / 100, size / 1000, 10_000);

        group.bench_with_input(BenchmarkId::new("agents", size), size, |b, _| {
            b.iter(|| engine.repopulate(&state, black_box(&utilities), &mut rng).unwrap());
        });
    }

    group.finish();
}

// ============ POLICY BENCHMARKS ============

fn bench_fdt_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("fdt");

    let synth = FdtPolicySynthesizer::new(0.9, DilemmaPayoffs::default());
    let rates = PopulationRates::<Player>::uniform();
    group.bench_function("converging", |b| {
        b.iter(|| synth.synthesize(black_box(&rates)));
    });

    let cycling = FdtPolicySynthesizer::new(
        0.35,
        DilemmaPayoffs {
            loss: 1.0,
            defect: 2.0,
            cooperate: 60.0,
            win: 100.0,
        },
    );
    let skewed = PopulationRates::<Player>::new(vec![0.05, 0.15, 0.8]).unwrap();
    group.bench_function("cycling", |b| {
        b.iter(|| cycling.synthesize(black_box(&skewed)));
    });

    group.finish();
}

// ============ GENERATION BENCHMARKS ============

fn bench_signaling_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for size in [1_000usize, 10_000].iter() {
        let game = SignalingGame::new(SignalingConfig {
            simulation: SimulationConfig {
                population_size: *size,
                rounds: 10,
                ..SimulationConfig::default()
            },
            ..SignalingConfig::default()
        })
        .unwrap();
        let engine = EvolutionEngine::from_config(game.simulation());
        let mut rng = seeded(4);
        let state = evodt_runner::initialize(&game, &mut rng).unwrap();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("signaling", size), size, |b, _| {
            b.iter(|| run_generation(&game, &engine, &state, 0, &mut rng).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_weighted_sampler,
    bench_realize,
    bench_repopulate,
    bench_fdt_synthesis,
    bench_signaling_generation,
);

criterion_main!(benches);
