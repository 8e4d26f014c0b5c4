//! Game loop: drives the simulation engine through a scenario.
//!
//! `run_headless` ticks as fast as it can. `spawn_game_loop` moves the engine
//! onto its own thread and ticks at the configured rate, scaled by
//! `time_scale`. Extra launcher commands arrive via an `mpsc` channel and the
//! latest snapshot is kept in shared state for polling.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use laserguide_core::state::SimSnapshot;
use laserguide_sim::scenario::Scenario;
use laserguide_sim::SimulationEngine;

use crate::state::{GameLoopCommand, RunSummary, SharedSnapshot};

/// Run `ticks` ticks of `scenario` without sleeping.
pub fn run_headless(engine: &mut SimulationEngine, scenario: &Scenario, ticks: u64) -> RunSummary {
    let mut summary = RunSummary::default();
    for tick in 0..ticks {
        summary.record(step(engine, scenario, tick));
    }
    info!(ticks, explosions = summary.explosions, "headless run finished");
    summary
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle that yields the run summary.
pub fn spawn_game_loop(
    mut engine: SimulationEngine,
    scenario: Scenario,
    max_ticks: u64,
    latest_snapshot: SharedSnapshot,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("laserguide-game-loop".into())
        .spawn(move || {
            run_game_loop(&mut engine, &scenario, &cmd_rx, max_ticks, &latest_snapshot)
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until `max_ticks`, a Shutdown command or channel
/// disconnect.
fn run_game_loop(
    engine: &mut SimulationEngine,
    scenario: &Scenario,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    max_ticks: u64,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut next_tick_time = Instant::now();

    for tick in 0..max_ticks {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Launcher(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    debug!(tick, "game loop stopping");
                    return summary;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Scripted commands, then one tick
        let snapshot = step(engine, scenario, tick);

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        summary.record(snapshot);

        // 4. Sleep until next tick, adjusting for time_scale
        let tick_duration = tick_duration(engine);
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind: reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }

    info!(ticks = max_ticks, explosions = summary.explosions, "game loop finished");
    summary
}

fn step(engine: &mut SimulationEngine, scenario: &Scenario, tick: u64) -> SimSnapshot {
    engine.queue_commands(scenario.commands_at(tick));
    engine.tick()
}

/// Wall-clock length of one tick.
fn tick_duration(engine: &SimulationEngine) -> Duration {
    let config = engine.config();
    let nominal = Duration::from_secs_f64(config.dt());
    if config.time_scale > 0.001 {
        nominal.div_f64(config.time_scale)
    } else {
        nominal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use laserguide_core::commands::LauncherCommand;
    use laserguide_core::enums::ScenarioId;
    use laserguide_sim::config::SimConfig;
    use laserguide_sim::scenario;

    fn setup(id: ScenarioId, config: SimConfig) -> (SimulationEngine, Scenario) {
        let mut engine = SimulationEngine::with_tracer(config, scenario::tracer(id));
        let scenario = scenario::setup(&mut engine, id).unwrap();
        (engine, scenario)
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Launcher(LauncherCommand::StartGuiding { launcher: 1 }))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Launcher(LauncherCommand::StartGuiding { launcher: 1 })
        ));
        assert!(matches!(commands[1], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_headless_run_detonates() {
        let (mut engine, scenario) = setup(ScenarioId::PlayerOpenField, SimConfig::default());
        let summary = run_headless(&mut engine, &scenario, 600);
        assert_eq!(summary.ticks, 600);
        assert_eq!(summary.launches, 1);
        assert_eq!(summary.explosions, 1);
    }

    #[test]
    fn test_game_loop_stops_on_shutdown() {
        let (engine, scenario) = setup(ScenarioId::NpcAmbush, SimConfig::default());
        let latest: SharedSnapshot = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(engine, scenario, 100_000, latest.clone()).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();
        let summary = handle.join().unwrap();
        assert!(summary.ticks < 100_000);
    }

    #[test]
    fn test_game_loop_publishes_snapshots() {
        let config = SimConfig {
            time_scale: 100.0,
            ..Default::default()
        };
        let (engine, scenario) = setup(ScenarioId::ZoneBarrier, config);
        let latest: SharedSnapshot = Arc::new(Mutex::new(None));
        let (_tx, handle) = spawn_game_loop(engine, scenario, 20, latest.clone()).unwrap();
        let summary = handle.join().unwrap();
        assert_eq!(summary.ticks, 20);
        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snapshot.time.tick, 20);
        assert_eq!(snapshot.zone_count, 1);
    }

    #[test]
    fn test_tick_duration_scales() {
        let config = SimConfig {
            time_scale: 2.0,
            ..Default::default()
        };
        let engine = SimulationEngine::new(config);
        let expected = Duration::from_secs_f64(1.0 / 66.0).div_f64(2.0);
        assert_eq!(tick_duration(&engine), expected);
    }
}
