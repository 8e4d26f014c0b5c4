//! Designator registry: the set of live target designators.
//!
//! Owned by the engine, one per simulation. Handles are generation-tagged
//! `hecs::Entity` values, so a stale handle can never alias a newer
//! designator. Iteration yields the newest designator first; callers may rely
//! on completeness but not on order.
//!
//! A designator despawned straight through the world, bypassing `remove`,
//! stays listed until the next `prune_dead`, which the projectile system runs
//! every tick before seeking.

use hecs::{Entity, World};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct DesignatorRegistry {
    entries: Vec<Entity>,
}

impl DesignatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created designator.
    pub fn insert(&mut self, designator: Entity) {
        if self.contains(designator) {
            warn!(designator = ?designator, "designator registered twice, ignoring");
            return;
        }
        self.entries.push(designator);
    }

    /// Unregister a designator. Returns false when it was not registered.
    pub fn remove(&mut self, designator: Entity) -> bool {
        match self.entries.iter().position(|e| *e == designator) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop entries whose entity no longer exists. Returns how many went.
    pub fn prune_dead(&mut self, world: &World) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| world.contains(*e));
        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!(pruned, "stale designators pruned");
        }
        pruned
    }

    /// Every registered designator, newest first.
    pub fn all_live(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.iter().rev().copied()
    }

    pub fn contains(&self, designator: Entity) -> bool {
        self.entries.contains(&designator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
