//! Simulation engine for laser-guided projectiles.
//!
//! Owns the hecs ECS world, the designator registry and the forced-detonation
//! zone table, runs systems at a fixed tick rate, and produces `SimSnapshot`s
//! for whatever drives it.

pub mod config;
pub mod engine;
pub mod error;
pub mod guidance;
pub mod registry;
pub mod scenario;
pub mod systems;
pub mod trace;
pub mod world_setup;
pub mod zones;

pub use engine::SimulationEngine;
pub use laserguide_core as core;
