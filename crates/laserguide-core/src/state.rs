//! Simulation snapshot: the visible state handed to presentation layers each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{EntityBits, WorldEvent};
use crate::types::{Orientation, Position, SimTime, Velocity};

/// Complete visible state after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub projectiles: Vec<ProjectileView>,
    pub designators: Vec<DesignatorView>,
    pub zone_count: usize,
    pub events: Vec<WorldEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub entity: EntityBits,
    pub state: ProjectileState,
    pub life: LifeState,
    pub position: Position,
    pub velocity: Velocity,
    pub orientation: Orientation,
    pub health: i32,
    pub solid: bool,
    pub launcher: Option<EntityBits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignatorView {
    pub entity: EntityBits,
    pub position: Position,
    pub on: bool,
    pub rendered: bool,
    pub scale: f64,
    pub owner: Option<EntityBits>,
    pub target: Option<EntityBits>,
}
