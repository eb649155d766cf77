//! Robot Simulator CLI
//!
//! Generates landmark-sensing episodes and writes them to stdout as JSON,
//! one document per line.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use robot_simulator::{EpisodeGenerator, MeasurementRange, SimulatorConfig};
use tokio::time::sleep;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "robot-simulator")]
#[command(about = "Generate synthetic robot motion and landmark measurements")]
struct Args {
    /// Side length of the square world
    #[arg(long)]
    world_size: Option<f64>,

    /// Per-axis sensing range (-1 for unlimited)
    #[arg(long, allow_hyphen_values = true)]
    measurement_range: Option<f64>,

    /// Motion noise scale
    #[arg(long)]
    motion_noise: Option<f64>,

    /// Measurement noise scale
    #[arg(long)]
    measurement_noise: Option<f64>,

    /// Number of landmarks
    #[arg(short, long)]
    landmarks: Option<usize>,

    /// Time steps per episode
    #[arg(short, long)]
    steps: Option<usize>,

    /// Distance moved per step
    #[arg(short, long)]
    distance: Option<f64>,

    /// Noise seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Number of episodes to generate
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Delay between episodes in milliseconds
    #[arg(long, default_value = "0")]
    tick_ms: u64,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn apply(self, mut config: SimulatorConfig) -> SimulatorConfig {
        if let Some(world_size) = self.world_size {
            config.params.world_size = world_size;
        }
        if let Some(range) = self.measurement_range {
            config.params.measurement_range = MeasurementRange::from(range);
        }
        if let Some(noise) = self.motion_noise {
            config.params.motion_noise = noise;
        }
        if let Some(noise) = self.measurement_noise {
            config.params.measurement_noise = noise;
        }
        if let Some(landmarks) = self.landmarks {
            config.num_landmarks = landmarks;
        }
        if let Some(steps) = self.steps {
            config.num_steps = steps;
        }
        if let Some(distance) = self.distance {
            config.distance = distance;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let tick = Duration::from_millis(args.tick_ms);
    let pretty = args.pretty;
    let config = args.apply(SimulatorConfig::from_env()?);

    // Initialize logging on stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("robot_simulator={}", config.log_level))),
        )
        .init();

    config.validate()?;

    info!(
        world_size = config.params.world_size,
        measurement_range = f64::from(config.params.measurement_range),
        motion_noise = config.params.motion_noise,
        measurement_noise = config.params.measurement_noise,
        landmarks = config.num_landmarks,
        steps = config.num_steps,
        episodes = config.episodes,
        seed = ?config.seed,
        "Starting robot simulation"
    );

    let episode_config = config.episode_config();
    let mut generator = match config.seed {
        Some(seed) => EpisodeGenerator::seeded(episode_config, seed),
        None => EpisodeGenerator::new(episode_config),
    };

    let stdout = io::stdout();
    for index in 0..config.episodes {
        let episode = generator.generate()?;
        info!(
            episode = index + 1,
            id = %episode.episode_id,
            observed = episode.observed_landmarks().len(),
            attempts = episode.attempts,
            "{}",
            generator.robot()
        );

        let mut out = stdout.lock();
        if pretty {
            serde_json::to_writer_pretty(&mut out, &episode)?;
        } else {
            serde_json::to_writer(&mut out, &episode)?;
        }
        writeln!(out)?;
        out.flush()?;
        drop(out);

        if !tick.is_zero() && index + 1 < config.episodes {
            sleep(tick).await;
        }
    }

    if config.episodes == 0 {
        warn!("No episodes requested");
    }
    info!("Simulation complete");

    Ok(())
}
