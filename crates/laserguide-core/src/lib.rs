//! Core types and definitions for the laser-guided projectile simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! components, commands, snapshots, events, and constants.
//! It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
