//! Launcher commands sent from the holder (input layer or AI) to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::events::EntityBits;
use crate::types::Position;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LauncherCommand {
    /// Fire along the direction `aim` (player rules: grace period only on a
    /// clear launch line).
    Fire { launcher: EntityBits, aim: DVec3 },
    /// Fire along `aim` (NPC rules: fixed grace period, designator switched off).
    FireNpc { launcher: EntityBits, aim: DVec3 },
    StartGuiding { launcher: EntityBits },
    StopGuiding { launcher: EntityBits },
    ToggleGuiding { launcher: EntityBits },
    SuppressGuiding { launcher: EntityBits, suppressed: bool },
    /// The holder now looks along `aim`; the laser follows.
    Aim { launcher: EntityBits, aim: DVec3 },
    /// NPC holders point the laser straight at a world position.
    AimAt { launcher: EntityBits, target: Position },
}

impl LauncherCommand {
    pub fn launcher(&self) -> EntityBits {
        match self {
            LauncherCommand::Fire { launcher, .. }
            | LauncherCommand::FireNpc { launcher, .. }
            | LauncherCommand::StartGuiding { launcher }
            | LauncherCommand::StopGuiding { launcher }
            | LauncherCommand::ToggleGuiding { launcher }
            | LauncherCommand::SuppressGuiding { launcher, .. }
            | LauncherCommand::Aim { launcher, .. }
            | LauncherCommand::AimAt { launcher, .. } => *launcher,
        }
    }
}
