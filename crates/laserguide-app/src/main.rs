use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::info;

use laserguide_app::game_loop;
use laserguide_app::state::SharedSnapshot;
use laserguide_core::enums::ScenarioId;
use laserguide_sim::config::SimConfig;
use laserguide_sim::{scenario, SimulationEngine};

#[derive(Parser)]
#[command(name = "laserguide")]
#[command(about = "Play a laser-guided projectile scenario and print what happened")]
struct Args {
    /// Scenario to play
    #[arg(default_value = "player-open-field")]
    scenario: String,

    /// TOML file overriding simulation settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the RNG seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Tick at wall-clock rate instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// List the built-in scenarios and exit
    #[arg(long)]
    list: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.list {
        for id in ScenarioId::ALL {
            println!("{}", id.name());
        }
        return Ok(());
    }

    let id = ScenarioId::from_name(&args.scenario)
        .ok_or_else(|| anyhow!("unknown scenario '{}' (try --list)", args.scenario))?;

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.ticks == 0 {
        bail!("--ticks must be at least 1");
    }

    let mut engine = SimulationEngine::with_tracer(config, scenario::tracer(id));
    let scenario = scenario::setup(&mut engine, id)
        .with_context(|| format!("setting up {}", id.name()))?;
    info!(scenario = id.name(), ticks = args.ticks, realtime = args.realtime, "starting run");

    let summary = if args.realtime {
        let latest: SharedSnapshot = Arc::new(Mutex::new(None));
        let (_cmd_tx, handle) = game_loop::spawn_game_loop(engine, scenario, args.ticks, latest)
            .context("spawning game loop thread")?;
        handle.join().map_err(|_| anyhow!("game loop thread panicked"))?
    } else {
        game_loop::run_headless(&mut engine, &scenario, args.ticks)
    };

    info!(
        launches = summary.launches,
        explosions = summary.explosions,
        shot_down = summary.shot_down,
        "run finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serializing run summary")?
    );
    Ok(())
}
