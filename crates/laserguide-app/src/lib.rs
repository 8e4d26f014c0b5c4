//! Headless runner for the laser-guided projectile simulation.
//!
//! Wires a scenario, a config file and the engine together, and drives the
//! engine either flat out or on a fixed-rate game loop thread.

pub mod game_loop;
pub mod state;

pub use laserguide_core as core;
