//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems, not
//! components. Cross-entity links are `hecs::Entity` handles: they carry a
//! generation, so a link to a despawned entity fails its liveness check
//! instead of dangling.

use glam::DVec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::Position;

/// Cooperative scheduler slot. The engine invokes the entity's think once the
/// simulation clock reaches `next_think`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThinkSchedule {
    /// `None` when nothing is scheduled.
    pub next_think: Option<f64>,
}

impl ThinkSchedule {
    pub fn at(time: f64) -> Self {
        Self {
            next_think: Some(time),
        }
    }

    pub fn is_due(&self, now: f64) -> bool {
        self.next_think.is_some_and(|t| t <= now)
    }
}

/// Smoke trail attached to a projectile. Owned by the effects collaborator;
/// the sim only tracks its handle and damaged flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocketTrail {
    pub id: u32,
    pub damaged: bool,
}

/// Guided projectile state.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub state: ProjectileState,
    pub life: LifeState,
    pub profile: GuidanceProfile,
    pub health: i32,
    pub max_health: i32,
    /// Cleared once the projectile is killed or detonates.
    pub takes_damage: bool,
    pub damage: f64,
    /// The entity that fired this projectile. Only designators with the same
    /// owner are considered when homing.
    pub owner: Option<Entity>,
    /// Back-reference to the launcher, taken exactly once on termination.
    pub launcher: Option<Entity>,
    /// While set the projectile is non-solid.
    pub grace_ends_at: Option<f64>,
    pub solid: bool,
    pub trail: Option<RocketTrail>,
    /// Emit a danger sound ahead of the flight path every seeking tick.
    pub create_danger_sounds: bool,
}

impl Projectile {
    pub fn new(owner: Option<Entity>, profile: GuidanceProfile) -> Self {
        Self {
            state: ProjectileState::Igniting,
            life: LifeState::Alive,
            profile,
            health: PROJECTILE_HEALTH,
            max_health: PROJECTILE_HEALTH,
            takes_damage: true,
            damage: PROJECTILE_DAMAGE,
            owner,
            launcher: None,
            grace_ends_at: None,
            solid: true,
            trail: None,
            create_danger_sounds: false,
        }
    }

    /// Health at or below which the projectile is shot down.
    pub fn auger_health(&self) -> i32 {
        let margin = match self.profile {
            GuidanceProfile::Standard => AUGER_HEALTH_MARGIN,
            GuidanceProfile::DirectChase => DIRECT_CHASE_AUGER_HEALTH_MARGIN,
        };
        self.max_health - margin
    }

    pub fn is_damaged(&self) -> bool {
        self.health <= self.auger_health()
    }
}

/// A laser-style aim point that projectiles home toward.
///
/// The world position is the entity's `Position` component.
#[derive(Debug, Clone)]
pub struct TargetDesignator {
    pub surface_normal: DVec3,
    /// Eligible for homing.
    pub on: bool,
    /// Invisible designators still guide; they just never render.
    pub visible: bool,
    /// Whether the marker sprite is currently shown.
    pub rendered: bool,
    pub owner: Option<Entity>,
    /// Entity under the dot, when it is something that takes damage.
    pub target: Option<Entity>,
    /// Cosmetic marker scale.
    pub scale: f64,
}

impl TargetDesignator {
    pub fn new(owner: Option<Entity>, visible: bool) -> Self {
        Self {
            surface_normal: DVec3::ZERO,
            on: true,
            visible,
            rendered: visible,
            owner,
            target: None,
            scale: DESIGNATOR_INITIAL_SCALE,
        }
    }

    pub fn turn_on(&mut self) {
        self.on = true;
        if self.visible {
            self.rendered = true;
        }
    }

    pub fn turn_off(&mut self) {
        self.on = false;
        if self.visible {
            self.rendered = false;
        }
    }

    /// The point projectiles actually chase: the dot pulled back off the
    /// surface so the projectile does not seek into it.
    pub fn chase_position(&self, position: &Position) -> Position {
        position.offset(-self.surface_normal * CHASE_STANDOFF)
    }
}

/// A weapon that owns at most one designator and one projectile in flight.
#[derive(Debug, Clone)]
pub struct Launcher {
    /// The actor holding the launcher.
    pub controller: Option<Entity>,
    pub controller_kind: ControllerKind,
    pub designator: Option<Entity>,
    /// Projectile in flight, cleared when it terminates.
    pub missile: Option<Entity>,
    pub guiding: bool,
    /// Overrides the holder's wish to guide.
    pub guidance_suppressed: bool,
    /// Unit direction the holder is looking along. The laser is traced from
    /// the holder's eye along this every tick while guiding.
    pub aim: DVec3,
    pub npc_aim_point: Position,
    /// Guidance profile given to every projectile this launcher fires.
    pub profile: GuidanceProfile,
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            controller: None,
            controller_kind: ControllerKind::default(),
            designator: None,
            missile: None,
            guiding: false,
            guidance_suppressed: false,
            // Holders face +x until they first aim.
            aim: DVec3::X,
            npc_aim_point: Position::default(),
            profile: GuidanceProfile::default(),
        }
    }
}

/// Body geometry of an actor, relative to its `Position` (feet).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub eye_height: f64,
    pub center_height: f64,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            eye_height: 64.0,
            center_height: 36.0,
        }
    }
}

/// Marks an entity that can take damage (and therefore be locked by a designator).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Damageable;

/// Marks a trigger volume. Projectiles pass through triggers that cannot take damage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TriggerVolume;

/// Classification of a potential target.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetProfile {
    pub class: TargetClass,
}

/// Collision sphere used by line traces. Entities without a hull are
/// invisible to the tracer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    pub radius: f64,
}
