//! Designator lifecycle and self-update.
//!
//! Every designator is registered from creation to destruction. The periodic
//! think only resizes the marker sprite; homing never reads the scale.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, warn};

use laserguide_core::components::TargetDesignator;
use laserguide_core::constants::*;
use laserguide_core::types::Position;

use super::{due_thinkers, schedule, TickContext};
use crate::error::SimError;
use crate::world_setup;

/// Run every due designator think.
pub fn run(world: &mut World, ctx: &mut TickContext) {
    for entity in due_thinkers::<TargetDesignator>(world, ctx.now) {
        think(world, ctx, entity);
    }
}

fn think(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    schedule(world, entity, Some(ctx.now + DESIGNATOR_THINK_INTERVAL));

    let Some((position, owner)) = world
        .query_one_mut::<(&Position, &TargetDesignator)>(entity)
        .ok()
        .map(|(pos, dot)| (*pos, dot.owner))
    else {
        return;
    };
    let Some(owner_pos) = owner.and_then(|o| world.get::<&Position>(o).ok().map(|p| *p)) else {
        return;
    };

    let dist = owner_pos.range_to(&position);
    let scale = remap(
        dist,
        DESIGNATOR_SCALE_DIST_NEAR,
        DESIGNATOR_SCALE_DIST_FAR,
        DESIGNATOR_SCALE_NEAR,
        DESIGNATOR_SCALE_FAR,
    );
    let spread = scale.abs() * DESIGNATOR_SCALE_JITTER;
    let jitter = ctx.rng.gen_range(-spread..=spread);
    let scale = (scale + jitter).clamp(DESIGNATOR_SCALE_MIN, DESIGNATOR_SCALE_MAX);

    if let Ok(mut dot) = world.get::<&mut TargetDesignator>(entity) {
        dot.scale = scale;
    }
}

/// Linear remap of `value` from `a..b` onto `c..d`, unclamped.
fn remap(value: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if a == b {
        return if value >= b { d } else { c };
    }
    c + (d - c) * (value - a) / (b - a)
}

/// Spawn and register a designator.
pub fn create(
    world: &mut World,
    ctx: &mut TickContext,
    origin: Position,
    owner: Option<Entity>,
    visible: bool,
) -> Entity {
    let entity = world_setup::spawn_designator(world, ctx.now, origin, owner, visible);
    ctx.registry.insert(entity);
    debug!(designator = ?entity, owner = ?owner, visible, "designator created");
    entity
}

/// Unregister and despawn a designator.
pub fn destroy(world: &mut World, ctx: &mut TickContext, entity: Entity) -> Result<(), SimError> {
    if world.get::<&TargetDesignator>(entity).is_err() {
        return Err(SimError::UnknownDesignator(entity));
    }
    if !ctx.registry.remove(entity) {
        warn!(designator = ?entity, "destroying a designator that was not registered");
    }
    let _ = world.despawn(entity);
    debug!(designator = ?entity, "designator destroyed");
    Ok(())
}

pub fn set_on(world: &mut World, entity: Entity, on: bool) -> Result<(), SimError> {
    let mut dot = world
        .get::<&mut TargetDesignator>(entity)
        .map_err(|_| SimError::UnknownDesignator(entity))?;
    if on {
        dot.turn_on();
    } else {
        dot.turn_off();
    }
    Ok(())
}

pub fn set_position(
    world: &mut World,
    entity: Entity,
    point: Position,
    surface_normal: DVec3,
) -> Result<(), SimError> {
    let (pos, dot) = world
        .query_one_mut::<(&mut Position, &mut TargetDesignator)>(entity)
        .map_err(|_| SimError::UnknownDesignator(entity))?;
    *pos = point;
    dot.surface_normal = surface_normal;
    Ok(())
}

pub fn set_target(
    world: &mut World,
    entity: Entity,
    target: Option<Entity>,
) -> Result<(), SimError> {
    let mut dot = world
        .get::<&mut TargetDesignator>(entity)
        .map_err(|_| SimError::UnknownDesignator(entity))?;
    dot.target = target;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_endpoints() {
        assert!((remap(32.0, 32.0, 1024.0, 0.01, 0.5) - 0.01).abs() < 1e-12);
        assert!((remap(1024.0, 32.0, 1024.0, 0.01, 0.5) - 0.5).abs() < 1e-12);
        // Unclamped beyond the far end.
        assert!(remap(2048.0, 32.0, 1024.0, 0.01, 0.5) > 0.5);
    }
}
