//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use laserguide_core::components::{Projectile, TargetDesignator};
use laserguide_core::events::WorldEvent;
use laserguide_core::state::*;
use laserguide_core::types::{Orientation, Position, SimTime, Velocity};

use super::bits;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    zone_count: usize,
    events: Vec<WorldEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        projectiles: build_projectiles(world),
        designators: build_designators(world),
        zone_count,
        events,
    }
}

/// Build ProjectileView list, sorted by entity for stable output.
fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut views: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position, &Velocity, &Orientation)>()
        .iter()
        .map(|(entity, (projectile, pos, vel, orientation))| ProjectileView {
            entity: bits(entity),
            state: projectile.state,
            life: projectile.life,
            position: *pos,
            velocity: *vel,
            orientation: *orientation,
            health: projectile.health,
            solid: projectile.solid,
            launcher: projectile.launcher.map(bits),
        })
        .collect();
    views.sort_by_key(|v| v.entity);
    views
}

fn build_designators(world: &World) -> Vec<DesignatorView> {
    let mut views: Vec<DesignatorView> = world
        .query::<(&TargetDesignator, &Position)>()
        .iter()
        .map(|(entity, (dot, pos))| DesignatorView {
            entity: bits(entity),
            position: *pos,
            on: dot.on,
            rendered: dot.rendered,
            scale: dot.scale,
            owner: dot.owner.map(bits),
            target: dot.target.map(bits),
        })
        .collect();
    views.sort_by_key(|v| v.entity);
    views
}
