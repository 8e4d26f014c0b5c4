//! Entity spawn factories for setting up the simulation world.
//!
//! Creates actors, targets, launchers, designators, and projectiles with
//! appropriate component bundles.

use glam::DVec3;
use hecs::{Entity, World};

use laserguide_core::components::*;
use laserguide_core::constants::*;
use laserguide_core::enums::*;
use laserguide_core::types::{Orientation, Position, Velocity};

use crate::config::GuidanceTuning;

/// Collision radius given to spawned actors and targets.
pub const ACTOR_HULL_RADIUS: f64 = 16.0;

/// Spawn an actor (a player or NPC body) standing at `feet`.
pub fn spawn_actor(world: &mut World, feet: Position) -> Entity {
    world.spawn((
        feet,
        Actor::default(),
        Hull {
            radius: ACTOR_HULL_RADIUS,
        },
        Damageable,
    ))
}

/// Spawn a damageable target that designators can lock onto.
pub fn spawn_target(
    world: &mut World,
    position: Position,
    class: TargetClass,
    radius: f64,
) -> Entity {
    world.spawn((position, Hull { radius }, Damageable, TargetProfile { class }))
}

/// Spawn a launcher held by `controller`.
pub fn spawn_launcher(
    world: &mut World,
    controller: Option<Entity>,
    kind: ControllerKind,
    profile: GuidanceProfile,
) -> Entity {
    world.spawn((Launcher {
        controller,
        controller_kind: kind,
        profile,
        ..Launcher::default()
    },))
}

/// Spawn a designator at `origin`. Its first self-update runs shortly after.
pub fn spawn_designator(
    world: &mut World,
    now: f64,
    origin: Position,
    owner: Option<Entity>,
    visible: bool,
) -> Entity {
    world.spawn((
        origin,
        TargetDesignator::new(owner, visible),
        ThinkSchedule::at(now + DESIGNATOR_FIRST_THINK_DELAY),
    ))
}

/// Spawn a projectile coasting out of the launcher, ignition pending.
pub fn spawn_projectile(
    world: &mut World,
    now: f64,
    origin: Position,
    orientation: Orientation,
    owner: Option<Entity>,
    profile: GuidanceProfile,
    tuning: &GuidanceTuning,
) -> Entity {
    let velocity = orientation.forward() * tuning.launch_speed + DVec3::Z * tuning.launch_lift;
    world.spawn((
        origin,
        Velocity::from(velocity),
        orientation,
        MoveType::FlyGravity,
        Projectile::new(owner, profile),
        ThinkSchedule::at(now + tuning.ignite_delay),
    ))
}

/// World-space centre of an entity: its position, raised to mid-body for actors.
/// `None` when the entity is dead or has no position.
pub fn world_space_center(world: &World, entity: Entity) -> Option<Position> {
    let pos = *world.get::<&Position>(entity).ok()?;
    match world.get::<&Actor>(entity) {
        Ok(actor) => Some(pos.offset(DVec3::Z * actor.center_height)),
        Err(_) => Some(pos),
    }
}

/// Eye position of an actor, or its plain position for anything else.
pub fn eye_position(world: &World, entity: Entity) -> Option<Position> {
    let pos = *world.get::<&Position>(entity).ok()?;
    match world.get::<&Actor>(entity) {
        Ok(actor) => Some(pos.offset(DVec3::Z * actor.eye_height)),
        Err(_) => Some(pos),
    }
}

/// Where a projectile leaves the launcher when aimed along `forward` from `eye`.
pub fn muzzle_position(eye: &Position, forward: DVec3) -> Position {
    let forward = forward.normalize_or_zero();
    let right = forward.cross(DVec3::Z).normalize_or_zero();
    let up = right.cross(forward);
    let (f, r, u) = MUZZLE_OFFSET;
    eye.offset(forward * f + right * r + up * u)
}
