//! Headless host for the cognition core.
//!
//! Spawns agents into a small arena, drives them with a scripted policy for
//! a fixed number of steps, and prints one JSON summary per agent.
//!
//! ```bash
//! cargo run -p agent-sim -- --agents 6 --steps 1200 --seed 7 \
//!     --config crates/sim/data/cognition.toml \
//!     --presets crates/sim/data/personalities.ron
//! ```

mod dirs;
mod driver;
mod policy;
mod world;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use agent_content::{ConfigLoader, PresetRegistry, load_preset_registry};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use driver::{SimSettings, Simulation};
use world::WorldSettings;

/// Run cognition agents in a headless arena
#[derive(Parser, Debug)]
#[command(name = "agent-sim")]
#[command(about = "Headless arena for the agent cognition core", long_about = None)]
#[command(version)]
struct Args {
    /// Number of agents to spawn
    #[arg(short, long, env = "SIM_AGENTS", default_value = "4")]
    agents: usize,

    /// Number of fixed steps to simulate
    #[arg(short, long, env = "SIM_STEPS", default_value = "600")]
    steps: usize,

    /// Seconds per step
    #[arg(long, env = "SIM_DT", default_value = "0.1")]
    dt: f32,

    /// World and policy seed
    #[arg(long, env = "SIM_SEED", default_value = "0")]
    seed: u64,

    /// Half the side length of the square arena
    #[arg(long, default_value = "20.0")]
    arena: f32,

    /// Cognition tunables (TOML)
    #[arg(long, env = "COGNITION_CONFIG")]
    config: Option<PathBuf>,

    /// Personality presets (RON)
    #[arg(long, env = "COGNITION_PRESETS")]
    presets: Option<PathBuf>,

    /// Also write logs to a per-session file
    #[arg(long)]
    log_file: bool,

    /// Session name for the log directory (defaults to a timestamp)
    #[arg(long, env = "SIM_SESSION")]
    session: Option<String>,

    /// Pretty-print the JSON summary
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let _guard = setup_logging(args.log_file, args.session.as_deref())?;

    let config = ConfigLoader::load_or_default(args.config.as_deref())?;
    let presets = match &args.presets {
        Some(path) => load_preset_registry(path, config.personality)?,
        None => PresetRegistry::with_fallback(config.personality),
    };
    tracing::info!(
        target: "sim",
        agents = args.agents,
        steps = args.steps,
        seed = args.seed,
        presets = presets.len(),
        "starting simulation"
    );

    let settings = SimSettings {
        agents: args.agents,
        dt: args.dt,
        seed: args.seed,
        world: WorldSettings {
            half_extent: args.arena,
            ..WorldSettings::default()
        },
    };
    let mut sim = Simulation::new(&config, &presets, settings)?;
    sim.run(args.steps)?;

    let summaries = sim.summaries();
    let json = if args.pretty {
        serde_json::to_string_pretty(&summaries)
    } else {
        serde_json::to_string(&summaries)
    }
    .context("Failed to serialize summaries")?;
    println!("{json}");

    tracing::info!(target: "sim", elapsed = sim.elapsed(), "simulation finished");
    Ok(())
}

/// Logs go to stderr, and optionally to `<log dir>/<session>/sim.log`.
///
/// The returned guard must be held until exit so buffered file output is
/// flushed.
fn setup_logging(to_file: bool, session: Option<&str>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !to_file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let session = match session {
        Some(name) => name.to_string(),
        None => {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            format!("session_{timestamp}")
        }
    };
    let session_dir = dirs::log_dir().join(&session);
    std::fs::create_dir_all(&session_dir)
        .with_context(|| format!("Failed to create log directory {}", session_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_dir, "sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!(target: "sim", session = %session, "Log file: {}/sim.log", session_dir.display());
    Ok(Some(guard))
}
