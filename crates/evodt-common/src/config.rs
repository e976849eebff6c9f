//! Simulation configuration
//!
//! Immutable per-run constants. Values are layered from built-in defaults,
//! an optional config file, and `EVODT_`-prefixed environment variables.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Tolerance used when checking that a rate vector sums to 1
pub const RATE_SUM_TOLERANCE: f64 = 1e-6;

/// Default number of resamples before death selection gives up
pub const DEFAULT_MAX_RESAMPLE_ATTEMPTS: usize = 10_000;

/// Which game a run plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    /// Keynesian beauty contest
    Guessing,
    /// Transparent Newcomb problem
    Predictor,
    /// Prisoner's Dilemma with noisy type signals
    Signaling,
}

impl std::str::FromStr for GameKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "guessing" | "beauty" => Ok(Self::Guessing),
            "predictor" | "newcomb" => Ok(Self::Predictor),
            "signaling" | "dilemma" => Ok(Self::Signaling),
            other => Err(ConfigError::UnknownGame(other.to_string())),
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Guessing => "guessing",
            Self::Predictor => "predictor",
            Self::Signaling => "signaling",
        };
        f.write_str(name)
    }
}

/// Population dynamics shared by every game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of agents (N), fixed for the run
    pub population_size: usize,
    /// Number of generations to simulate
    pub generations: usize,
    /// Rounds of play per generation
    pub rounds: usize,
    /// Fraction of the population replaced by selection each generation
    pub death_rate: f64,
    /// Fraction of the population reassigned a random type each generation
    pub mutation_rate: f64,
    /// Report every this many generations
    pub report_interval: usize,
    /// Seed for the run RNG; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Cap on resamples while looking for a living type during death selection
    pub max_resample_attempts: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            generations: 1_000,
            rounds: 100,
            death_rate: 0.01,
            mutation_rate: 0.001,
            report_interval: 100,
            seed: None,
            max_resample_attempts: DEFAULT_MAX_RESAMPLE_ATTEMPTS,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(ConfigError::NonPositiveCount {
                name: "population_size",
            }
            .into());
        }
        if self.generations == 0 {
            return Err(ConfigError::NonPositiveCount { name: "generations" }.into());
        }
        if self.rounds == 0 {
            return Err(ConfigError::NonPositiveCount { name: "rounds" }.into());
        }
        if self.report_interval == 0 {
            return Err(ConfigError::NonPositiveCount {
                name: "report_interval",
            }
            .into());
        }
        if self.max_resample_attempts == 0 {
            return Err(ConfigError::NonPositiveCount {
                name: "max_resample_attempts",
            }
            .into());
        }
        check_unit("death_rate", self.death_rate)?;
        check_unit("mutation_rate", self.mutation_rate)?;
        Ok(())
    }

    /// Number of births (and deaths) per generation
    pub fn death_count(&self) -> usize {
        (self.death_rate * self.population_size as f64).round() as usize
    }

    /// Number of mutations per generation
    pub fn mutation_count(&self) -> usize {
        (self.mutation_rate * self.population_size as f64).round() as usize
    }
}

/// Prisoner's Dilemma payoffs, ordered `loss < defect < cooperate < win`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DilemmaPayoffs {
    /// Sucker's payoff (cooperate against a defector)
    pub loss: f64,
    /// Mutual defection
    pub defect: f64,
    /// Mutual cooperation
    pub cooperate: f64,
    /// Temptation (defect against a cooperator)
    pub win: f64,
}

impl Default for DilemmaPayoffs {
    fn default() -> Self {
        Self {
            loss: 1.0,
            defect: 4.0,
            cooperate: 7.0,
            win: 10.0,
        }
    }
}

impl DilemmaPayoffs {
    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.loss
            && self.loss < self.defect
            && self.defect < self.cooperate
            && self.cooperate < self.win;
        if !ordered {
            return Err(ConfigError::PayoffOrdering {
                ordering: "0 <= loss < defect < cooperate < win",
            }
            .into());
        }
        Ok(())
    }

    /// Four distinct integers from 1 to 999, assigned in ascending order
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut picks: Vec<usize> = index::sample(rng, 999, 4).into_iter().collect();
        picks.sort_unstable();
        Self {
            loss: (picks[0] + 1) as f64,
            defect: (picks[1] + 1) as f64,
            cooperate: (picks[2] + 1) as f64,
            win: (picks[3] + 1) as f64,
        }
    }
}

/// Newcomb payoffs: the opaque box holds `high`, the transparent one `low`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorPayoffs {
    pub high: f64,
    pub low: f64,
}

impl Default for PredictorPayoffs {
    fn default() -> Self {
        Self {
            high: 10_000.0,
            low: 1_000.0,
        }
    }
}

impl PredictorPayoffs {
    pub fn validate(&self) -> Result<()> {
        if !(0.0 < self.low && self.low < self.high) {
            return Err(ConfigError::PayoffOrdering {
                ordering: "0 < low < high",
            }
            .into());
        }
        Ok(())
    }

    /// Two distinct integers from 1 to 1,000,000 with `low < high`
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut picks: Vec<usize> = index::sample(rng, 1_000_000, 2).into_iter().collect();
        picks.sort_unstable();
        Self {
            low: (picks[0] + 1) as f64,
            high: (picks[1] + 1) as f64,
        }
    }
}

/// Keynesian beauty contest settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessingConfig {
    pub simulation: SimulationConfig,
    /// Target multiplier applied to the average guess
    pub frac: f64,
    /// Random guessers draw uniformly from `[0, guess_ceiling)`
    pub guess_ceiling: f64,
    /// Payoff awarded for an exact (or near-exact) guess
    pub utility_cap: f64,
    /// Initial rates for (Causal, Random, Functional)
    pub initial_rates: Vec<f64>,
}

impl Default for GuessingConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                generations: 100_000,
                report_interval: 1_000,
                ..SimulationConfig::default()
            },
            frac: 2.0 / 3.0,
            guess_ceiling: 100.0,
            utility_cap: 1_000.0,
            initial_rates: vec![1.0 / 3.0; 3],
        }
    }
}

impl GuessingConfig {
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        // frac >= 1 makes the best-response system singular
        if !(self.frac > 0.0 && self.frac < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "frac",
                value: self.frac,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        if !(self.guess_ceiling > 0.0) {
            return Err(ConfigError::NonPositiveCount {
                name: "guess_ceiling",
            }
            .into());
        }
        if !(self.utility_cap > 0.0) {
            return Err(ConfigError::NonPositiveCount {
                name: "utility_cap",
            }
            .into());
        }
        Ok(())
    }
}

/// Transparent Newcomb problem settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub simulation: SimulationConfig,
    /// Probability the predictor is right
    pub accuracy: f64,
    pub payoffs: PredictorPayoffs,
    /// Initial rates for (Causal, Functional)
    pub initial_rates: Vec<f64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                population_size: 3_000,
                generations: 200,
                ..SimulationConfig::default()
            },
            accuracy: 0.99,
            payoffs: PredictorPayoffs::default(),
            initial_rates: vec![1.0, 0.0],
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        check_unit("accuracy", self.accuracy)?;
        self.payoffs.validate()
    }
}

/// Noisy-signal Prisoner's Dilemma settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalingConfig {
    pub simulation: SimulationConfig,
    /// Probability a received signal names the opponent's true type
    pub accuracy: f64,
    pub payoffs: DilemmaPayoffs,
    /// Initial rates for (Defector, Cooperator, Functional)
    pub initial_rates: Vec<f64>,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            accuracy: 0.9,
            payoffs: DilemmaPayoffs::default(),
            initial_rates: vec![1.0 / 3.0; 3],
        }
    }
}

impl SignalingConfig {
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        if self.simulation.population_size % 2 != 0 {
            return Err(ConfigError::OddPopulation(self.simulation.population_size).into());
        }
        check_unit("accuracy", self.accuracy)?;
        self.payoffs.validate()
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Game to simulate
    pub game: GameKind,
    /// Replace the configured payoffs with random ones at start-up
    pub randomize_payoffs: bool,
    pub guessing: GuessingConfig,
    pub predictor: PredictorConfig,
    pub signaling: SignalingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameKind::Signaling,
            randomize_payoffs: false,
            guessing: GuessingConfig::default(),
            predictor: PredictorConfig::default(),
            signaling: SignalingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Environment keys use `EVODT_` with `__` between sections, e.g.
    /// `EVODT_SIGNALING__ACCURACY=0.95`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("EVODT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        debug!(
            game = %cfg.game,
            randomize_payoffs = cfg.randomize_payoffs,
            "configuration loaded"
        );
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        match self.game {
            GameKind::Guessing => self.guessing.validate(),
            GameKind::Predictor => self.predictor.validate(),
            GameKind::Signaling => self.signaling.validate(),
        }
    }
}

/// Check a rate vector has the expected arity, entries in `[0, 1]`, and sums to 1
pub fn validate_rates(rates: &[f64], labels: &[&str]) -> Result<()> {
    if rates.len() != labels.len() {
        return Err(ConfigError::RateArity {
            expected: labels.len(),
            actual: rates.len(),
        }
        .into());
    }
    for (rate, label) in rates.iter().zip(labels) {
        if !(0.0..=1.0).contains(rate) {
            return Err(ConfigError::RateOutOfRange {
                label: label.to_string(),
                rate: *rate,
            }
            .into());
        }
    }
    let sum: f64 = rates.iter().sum();
    if (sum - 1.0).abs() > RATE_SUM_TOLERANCE {
        return Err(ConfigError::RatesNotNormalized { sum }.into());
    }
    Ok(())
}

fn check_unit(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        }
        .into());
    }
    Ok(())
}
