//! Forced-detonation zones.
//!
//! A zone is anchored to an owner entity and follows it. Any projectile that
//! is seeking inside a zone detonates at once. Zones whose owner has been
//! despawned are pruned during the next scan, never eagerly.

use hecs::{Entity, World};
use tracing::debug;

use laserguide_core::types::Position;

use crate::error::SimError;
use crate::world_setup::world_space_center;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetonationZone {
    pub owner: Entity,
    pub radius_sq: f64,
    /// Positive: vertical cylinder of this half-height. Otherwise a sphere.
    pub half_height: f64,
}

impl DetonationZone {
    /// Whether `point` lies strictly inside the zone centred on `center`.
    pub fn contains(&self, center: &Position, point: &Position) -> bool {
        if self.half_height > 0.0 {
            (point.z - center.z).abs() < self.half_height
                && center.horizontal_range_sq_to(point) < self.radius_sq
        } else {
            center.range_sq_to(point) < self.radius_sq
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ForcedDetonationZones {
    zones: Vec<DetonationZone>,
}

impl ForcedDetonationZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone around `owner`. A non-positive `height` selects the
    /// spherical test.
    pub fn add_zone(&mut self, owner: Entity, radius: f64, height: f64) -> Result<(), SimError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidZone { radius });
        }
        let zone = DetonationZone {
            owner,
            radius_sq: radius * radius,
            half_height: height * 0.5,
        };
        debug!(owner = ?owner, radius, height, "forced detonation zone added");
        self.zones.push(zone);
        Ok(())
    }

    /// Remove every zone anchored to `owner`. Returns how many were removed.
    pub fn remove_zone(&mut self, owner: Entity) -> usize {
        let before = self.zones.len();
        self.zones.retain(|z| z.owner != owner);
        let removed = before - self.zones.len();
        if removed > 0 {
            debug!(owner = ?owner, removed, "forced detonation zone removed");
        }
        removed
    }

    /// Test `point` against every zone, newest first. Zones with a dead owner
    /// are dropped along the way.
    pub fn test_point(&mut self, world: &World, point: &Position) -> bool {
        for i in (0..self.zones.len()).rev() {
            let zone = self.zones[i];
            if !world.contains(zone.owner) {
                debug!(owner = ?zone.owner, "pruning zone with dead owner");
                self.zones.swap_remove(i);
                continue;
            }
            let Some(center) = world_space_center(world, zone.owner) else {
                continue;
            };
            if zone.contains(&center, point) {
                return true;
            }
        }
        false
    }

    pub fn zones(&self) -> &[DetonationZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
