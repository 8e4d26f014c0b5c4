//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Projectile lifecycle state.
///
/// Exactly one behaviour is active at a time; deadlines belong to the state
/// that uses them instead of living on the projectile as loose timers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum ProjectileState {
    /// Launched, coasting under gravity until ignition.
    Igniting,
    /// Homing toward the best designator every tick.
    Seeking,
    /// Shot down: spiralling until `explode_at`.
    Auguring { explode_at: f64, dying_at: f64 },
    /// Guidance cancelled; flies straight until it hits something.
    DumbFire,
    /// Terminal. The projectile is removed at the end of the tick.
    Exploded,
}

impl ProjectileState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectileState::Exploded)
    }
}

/// Coarse life status consumed by overlays and animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    Dying,
    Dead,
}

/// How a mover is integrated each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    /// Straight-line flight, no gravity.
    #[default]
    Fly,
    /// Ballistic flight.
    FlyGravity,
    /// Never moved by integration.
    None,
}

/// Aim-point strategy, fixed at spawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuidanceProfile {
    /// Chase the laser segment nearest the projectile when the laser and the
    /// real target diverge; chase the dot otherwise.
    #[default]
    Standard,
    /// Always chase the designator's chase position.
    DirectChase,
}

/// Who is holding a launcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerKind {
    #[default]
    Player,
    Npc,
}

/// Damage categories. Projectiles only react to the defensive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Bullet,
    Blast,
    /// Point-defence fire aimed at incoming munitions.
    MissileDefense,
    /// Vehicle-mounted guns.
    Vehicle,
}

impl DamageKind {
    pub fn hurts_projectiles(&self) -> bool {
        matches!(self, DamageKind::MissileDefense | DamageKind::Vehicle)
    }
}

/// Target classes the homing logic treats specially.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetClass {
    #[default]
    Generic,
    /// Tall walkers that projectiles tend to orbit at short range.
    Walker,
}

/// Audio cues emitted for the sound collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    MissileIgnite,
    LauncherFire,
    LauncherFireNpc,
    GuidanceOn,
    GuidanceOff,
}

/// Built-in scenarios the runner can play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioId {
    /// A player guides a shot onto a target across open ground.
    #[default]
    PlayerOpenField,
    /// An NPC ambushes a target with a direct-chase launcher.
    NpcAmbush,
    /// A forced-detonation zone stands between the player and the target.
    ZoneBarrier,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [
        ScenarioId::PlayerOpenField,
        ScenarioId::NpcAmbush,
        ScenarioId::ZoneBarrier,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::PlayerOpenField => "player-open-field",
            ScenarioId::NpcAmbush => "npc-ambush",
            ScenarioId::ZoneBarrier => "zone-barrier",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}
