//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus a `TickContext` that
//! lends them the engine-owned state they need. They do not own state: all
//! per-entity state lives in components.

pub mod cleanup;
pub mod designator;
pub mod launcher;
pub mod movement;
pub mod projectile;
pub mod snapshot;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use laserguide_core::components::ThinkSchedule;
use laserguide_core::events::{EntityBits, WorldEvent};

use crate::config::SimConfig;
use crate::registry::DesignatorRegistry;
use crate::trace::Tracer;
use crate::zones::ForcedDetonationZones;

/// Engine state lent to systems for one tick (or one API call).
pub struct TickContext<'a> {
    /// Simulation clock, seconds.
    pub now: f64,
    pub config: &'a SimConfig,
    pub rng: &'a mut ChaCha8Rng,
    pub registry: &'a mut DesignatorRegistry,
    pub zones: &'a mut ForcedDetonationZones,
    pub tracer: &'a dyn Tracer,
    pub events: &'a mut Vec<WorldEvent>,
    pub next_trail_id: &'a mut u32,
}

impl TickContext<'_> {
    pub fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }
}

/// Entities carrying component `T` whose think is due, in spawn order.
pub(crate) fn due_thinkers<T: hecs::Component>(world: &World, now: f64) -> Vec<Entity> {
    let mut due: Vec<Entity> = world
        .query::<(&T, &ThinkSchedule)>()
        .iter()
        .filter(|(_, (_, schedule))| schedule.is_due(now))
        .map(|(entity, _)| entity)
        .collect();
    due.sort_by_key(|e| e.id());
    due
}

pub(crate) fn schedule(world: &mut World, entity: Entity, next: Option<f64>) {
    if let Ok(mut slot) = world.get::<&mut ThinkSchedule>(entity) {
        slot.next_think = next;
    }
}

/// Raw bits of an entity handle, as exported in events and snapshots.
pub fn bits(entity: Entity) -> EntityBits {
    entity.to_bits().get()
}
