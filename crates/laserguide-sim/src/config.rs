//! Simulation configuration, optionally loaded from TOML.
//!
//! Every field has a default taken from `laserguide_core::constants`, so a
//! config file only needs the keys it wants to change:
//!
//! ```toml
//! seed = 7
//! simulate_alternate_ticks = true
//!
//! [tuning]
//! homing_speed = 0.2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use laserguide_core::constants::*;

use crate::error::SimError;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per simulated second.
    pub tick_rate: f64,
    /// Think on every other tick, with twice the step and twice the homing.
    pub simulate_alternate_ticks: bool,
    /// Wall-clock multiplier used by the runner (1.0 = normal).
    pub time_scale: f64,
    /// Projectiles detonate inside registered zones.
    pub forced_detonation_zones: bool,
    /// Emit a danger sound at a designator the projectile is about to reach.
    pub warn_near_designator: bool,
    /// Tighten homing near walker-class targets.
    pub close_target_boost: bool,
    pub tuning: GuidanceTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE as f64,
            simulate_alternate_ticks: false,
            time_scale: 1.0,
            forced_detonation_zones: true,
            warn_near_designator: true,
            close_target_boost: true,
            tuning: GuidanceTuning::default(),
        }
    }
}

impl SimConfig {
    /// Seconds simulated per tick.
    pub fn dt(&self) -> f64 {
        let dt = 1.0 / self.tick_rate;
        if self.simulate_alternate_ticks {
            dt * 2.0
        } else {
            dt
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, SimError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(SimError::InvalidConfig {
                name: "tick_rate",
                value: self.tick_rate,
                valid_range: "(0, inf)",
            });
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(SimError::InvalidConfig {
                name: "time_scale",
                value: self.time_scale,
                valid_range: "[0, inf)",
            });
        }
        self.tuning.validate()
    }
}

/// Numeric tuning of the projectile and its guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuidanceTuning {
    pub projectile_speed: f64,
    pub launch_speed: f64,
    pub launch_lift: f64,
    pub ignite_delay: f64,
    /// Base blend factor between current heading and target heading.
    pub homing_speed: f64,
    pub segment_lead_distance: f64,
    pub segment_chase_proximity: f64,
    pub close_target_range: f64,
    pub close_target_homing_factor: f64,
    /// Danger warnings fire when the best designator is within
    /// `speed * danger_speed_factor` units.
    pub danger_speed_factor: f64,
    pub auger_duration: f64,
    pub auger_dying_after: f64,
    pub auger_speed: f64,
    pub player_grace_period: f64,
    pub npc_grace_period: f64,
    pub gravity: f64,
}

impl Default for GuidanceTuning {
    fn default() -> Self {
        Self {
            projectile_speed: PROJECTILE_SPEED,
            launch_speed: PROJECTILE_LAUNCH_SPEED,
            launch_lift: PROJECTILE_LAUNCH_LIFT,
            ignite_delay: PROJECTILE_IGNITE_DELAY,
            homing_speed: HOMING_SPEED,
            segment_lead_distance: SEGMENT_LEAD_DISTANCE,
            segment_chase_proximity: SEGMENT_CHASE_PROXIMITY,
            close_target_range: CLOSE_TARGET_RANGE,
            close_target_homing_factor: CLOSE_TARGET_HOMING_FACTOR,
            danger_speed_factor: DANGER_SPEED_FACTOR,
            auger_duration: AUGER_DURATION,
            auger_dying_after: AUGER_DYING_AFTER,
            auger_speed: AUGER_SPEED,
            player_grace_period: PLAYER_GRACE_PERIOD,
            npc_grace_period: NPC_GRACE_PERIOD,
            gravity: GRAVITY,
        }
    }
}

impl GuidanceTuning {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.homing_speed) {
            return Err(SimError::InvalidConfig {
                name: "tuning.homing_speed",
                value: self.homing_speed,
                valid_range: "[0, 1]",
            });
        }
        let non_negative = [
            ("tuning.projectile_speed", self.projectile_speed),
            ("tuning.ignite_delay", self.ignite_delay),
            ("tuning.auger_duration", self.auger_duration),
            ("tuning.auger_dying_after", self.auger_dying_after),
            ("tuning.player_grace_period", self.player_grace_period),
            ("tuning.npc_grace_period", self.npc_grace_period),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidConfig {
                    name,
                    value,
                    valid_range: "[0, inf)",
                });
            }
        }
        Ok(())
    }
}
