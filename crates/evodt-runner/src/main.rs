//! Evodt Binary
//!
//! Runs one simulation of the configured game and prints its outcome as JSON.

use anyhow::Result;
use evodt_common::{rng, AppConfig, DilemmaPayoffs, GameKind, PredictorPayoffs, VERSION};
use evodt_games::{Game, GuessingGame, PredictorGame, SignalingGame};
use prometheus::{Registry, TextEncoder};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evodt_runner::{ChannelSink, PopulationMetrics, ReportSink, Simulation, TracingSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Evodt v{}", VERSION);

    // Load configuration
    let path = std::env::var("EVODT_CONFIG").ok();
    let mut config = AppConfig::load(path.as_deref())?;
    info!("Loaded configuration: game={}", config.game);

    if config.randomize_payoffs {
        randomize_payoffs(&mut config);
    }

    match config.game {
        GameKind::Guessing => execute(GuessingGame::new(config.guessing)?).await,
        GameKind::Predictor => execute(PredictorGame::new(config.predictor)?).await,
        GameKind::Signaling => execute(SignalingGame::new(config.signaling)?).await,
    }
}

fn randomize_payoffs(config: &mut AppConfig) {
    let (seed, mut rng) = rng::from_entropy_seed();
    match config.game {
        GameKind::Guessing => {}
        GameKind::Predictor => {
            config.predictor.payoffs = PredictorPayoffs::randomized(&mut rng);
            info!(seed, payoffs = ?config.predictor.payoffs, "randomized payoffs");
        }
        GameKind::Signaling => {
            config.signaling.payoffs = DilemmaPayoffs::randomized(&mut rng);
            info!(seed, payoffs = ?config.signaling.payoffs, "randomized payoffs");
        }
    }
}

async fn execute<G: Game + 'static>(game: G) -> Result<()> {
    let registry = Registry::new();
    let metrics = PopulationMetrics::new()?;
    metrics.register(&registry)?;

    let (channel, mut reports) = ChannelSink::<G::Agent, G::Params>::channel();
    let sinks: Vec<Box<dyn ReportSink<G::Agent, G::Params>>> =
        vec![Box::new(TracingSink), Box::new(channel), Box::new(metrics)];

    // Stream periodic reports to stdout as JSON lines
    let printer = tokio::spawn(async move {
        while let Some(summary) = reports.recv().await {
            match serde_json::to_string(&summary) {
                Ok(line) => println!("{}", line),
                Err(e) => debug!(error = %e, "failed to encode report"),
            }
        }
    });

    let outcome = tokio::task::spawn_blocking(move || {
        let mut simulation = Simulation::new(&game, None)?;
        simulation.run(&sinks)
    })
    .await??;

    printer.await?;

    let encoded = TextEncoder::new().encode_to_string(&registry.gather())?;
    debug!("Final metrics:\n{}", encoded);

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
