//! Events emitted by the simulation for the world-effect collaborators.
//!
//! Everything here is fire-and-forget: the simulation never reads a result back.

use serde::{Deserialize, Serialize};

use crate::enums::SoundCue;
use crate::types::Position;

/// Entities are exported as the raw bits of their generational handle.
pub type EntityBits = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorldEvent {
    /// Let nearby actors react defensively.
    DangerSound {
        position: Position,
        radius: f64,
        duration_secs: f64,
    },
    /// Generic combat noise (launch report).
    CombatSound {
        position: Position,
        radius: f64,
        duration_secs: f64,
    },
    PlaySound {
        cue: SoundCue,
        entity: EntityBits,
    },
    StopSound {
        cue: SoundCue,
        entity: EntityBits,
    },
    TrailSpawned {
        trail: u32,
        projectile: EntityBits,
    },
    TrailDamaged {
        trail: u32,
    },
    TrailExpiring {
        trail: u32,
        lifetime_secs: f64,
    },
    ScreenFlash {
        controller: EntityBits,
    },
    Rumble {
        controller: EntityBits,
    },
    ShotDown {
        position: Position,
    },
    Explosion {
        position: Position,
        damage: f64,
        radius: f64,
    },
    LauncherFired {
        launcher: EntityBits,
        projectile: EntityBits,
    },
    ProjectileTerminated {
        launcher: EntityBits,
    },
}
