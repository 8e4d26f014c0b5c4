//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick: position += velocity * dt.
//! Gravity-affected movers accelerate downward first. Solid projectiles sweep
//! their step through the tracer and stop at the first contact.

use hecs::{Entity, World};

use laserguide_core::components::Projectile;
use laserguide_core::enums::MoveType;
use laserguide_core::types::{Position, Velocity};

use crate::trace::Tracer;

/// A projectile ran into something during its step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub projectile: Entity,
    /// `None` for terrain.
    pub other: Option<Entity>,
}

/// Integrate every mover and report projectile contacts.
/// Detonated projectiles stay where they blew up.
pub fn run(world: &mut World, dt: f64, gravity: f64, tracer: &dyn Tracer) -> Vec<Contact> {
    let mut sweeps: Vec<(Entity, Position, Position, Option<Entity>)> = Vec::new();

    for (entity, (pos, vel, move_type, projectile)) in
        world.query_mut::<(&mut Position, &mut Velocity, &MoveType, Option<&Projectile>)>()
    {
        if projectile.is_some_and(|p| p.state.is_terminal()) {
            continue;
        }
        match move_type {
            MoveType::None => continue,
            MoveType::FlyGravity => vel.z -= gravity * dt,
            MoveType::Fly => {}
        }
        let start = *pos;
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;

        if let Some(p) = projectile.filter(|p| p.solid) {
            sweeps.push((entity, start, *pos, p.owner));
        }
    }

    let mut contacts = Vec::new();
    for (entity, start, end, owner) in sweeps {
        let hit = tracer.trace_line(world, &start, &end, owner);
        if hit.is_clear() {
            continue;
        }
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            *pos = hit.end;
        }
        contacts.push(Contact {
            projectile: entity,
            other: hit.entity,
        });
    }
    contacts
}
