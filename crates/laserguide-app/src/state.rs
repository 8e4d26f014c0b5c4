//! State shared between the runner and the game loop thread.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use laserguide_core::commands::LauncherCommand;
use laserguide_core::events::WorldEvent;
use laserguide_core::state::SimSnapshot;

/// Commands sent from the runner to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A launcher command to forward to the simulation engine.
    Launcher(LauncherCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, updated by the game loop after each tick.
pub type SharedSnapshot = Arc<Mutex<Option<SimSnapshot>>>;

/// What happened over a run, printed by the runner when it finishes.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub launches: usize,
    pub explosions: usize,
    pub shot_down: usize,
    pub final_snapshot: Option<SimSnapshot>,
}

impl RunSummary {
    pub fn record(&mut self, snapshot: SimSnapshot) {
        self.ticks = snapshot.time.tick;
        for event in &snapshot.events {
            match event {
                WorldEvent::LauncherFired { .. } => self.launches += 1,
                WorldEvent::Explosion { .. } => self.explosions += 1,
                WorldEvent::ShotDown { .. } => self.shot_down += 1,
                _ => {}
            }
        }
        self.final_snapshot = Some(snapshot);
    }
}
