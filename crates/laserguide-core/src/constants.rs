//! Simulation constants and tuning parameters.
//!
//! These are the authoritative defaults; `GuidanceTuning` in the sim crate
//! mirrors them and lets a TOML file override any subset.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 66;

/// Seconds per tick at the default rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Downward acceleration applied to gravity-affected movers (units/s²).
pub const GRAVITY: f64 = 600.0;

/// Longest line trace the world supports (units).
pub const MAX_TRACE_LENGTH: f64 = 56_755.840_862_417_8;

// --- Projectile launch ---

/// Flight speed after ignition (units/s).
pub const PROJECTILE_SPEED: f64 = 1500.0;

/// Forward speed imparted by the launcher before ignition.
pub const PROJECTILE_LAUNCH_SPEED: f64 = 300.0;

/// Upward kick imparted by the launcher before ignition.
pub const PROJECTILE_LAUNCH_LIFT: f64 = 128.0;

/// Delay between spawn and ignition (seconds).
pub const PROJECTILE_IGNITE_DELAY: f64 = 0.3;

pub const PROJECTILE_HEALTH: i32 = 100;

pub const PROJECTILE_DAMAGE: f64 = 200.0;

pub const EXPLOSION_RADIUS: f64 = 200.0;

/// Forward probe used to detect a sky surface before detonating.
pub const SKY_PROBE_DISTANCE: f64 = 16.0;

/// Trail lifetime once the projectile is gone (seconds).
pub const TRAIL_FADE_SECS: f64 = 0.1;

// --- Homing ---

/// Base per-tick blend toward the target heading.
pub const HOMING_SPEED: f64 = 0.125;

/// Blend results shorter than this fall back to a pure heading.
pub const DEGENERATE_BLEND_EPSILON: f64 = 1e-3;

/// Distance the segment-chase aim point is advanced along the laser (units).
pub const SEGMENT_LEAD_DISTANCE: f64 = 256.0;

/// Within this range of the chase position the projectile always segment-chases.
pub const SEGMENT_CHASE_PROXIMITY: f64 = 512.0;

/// Range inside which special-cased targets tighten the turn.
pub const CLOSE_TARGET_RANGE: f64 = 240.0;

/// Homing multiplier for special-cased targets within `CLOSE_TARGET_RANGE`.
pub const CLOSE_TARGET_HOMING_FACTOR: f64 = 1.75;

/// Homing multiplier when the world simulates on alternate ticks.
pub const ALTERNATE_TICK_HOMING_FACTOR: f64 = 2.0;

/// A designator closer than speed × this factor triggers a danger warning.
pub const DANGER_SPEED_FACTOR: f64 = 2.0;

pub const DANGER_SOUND_DURATION: f64 = 0.2;

/// Radius of the lead-ahead danger sound.
pub const LEAD_DANGER_RADIUS: f64 = 100.0;

/// Seconds of travel the lead-ahead danger trace looks forward.
pub const LEAD_DANGER_LOOKAHEAD: f64 = 0.5;

// --- Auguring ---

/// Damage headroom below max health at which the projectile is shot down.
pub const AUGER_HEALTH_MARGIN: i32 = 20;

/// Auger headroom for the direct-chase variant.
pub const DIRECT_CHASE_AUGER_HEALTH_MARGIN: i32 = 10;

pub const AUGER_DURATION: f64 = 1.5;

/// Time after shoot-down at which the projectile is flagged dying.
pub const AUGER_DYING_AFTER: f64 = 0.75;

pub const AUGER_THINK_INTERVAL: f64 = 0.05;

pub const AUGER_SPEED: f64 = 1000.0;

/// Maximum yaw wobble per auger think (degrees).
pub const AUGER_YAW_DEVIANCE: f64 = 20.0;

/// Maximum nose-down pitch wobble per auger think (degrees).
pub const AUGER_PITCH_DEVIANCE_DOWN: f64 = 8.0;

/// Maximum nose-up pitch wobble per auger think (degrees).
pub const AUGER_PITCH_DEVIANCE_UP: f64 = 1.0;

// --- Grace periods ---

/// Grace period given to a player's shot when the launch line is clear.
pub const PLAYER_GRACE_PERIOD: f64 = 0.3;

/// Grace period always given to NPC shots.
pub const NPC_GRACE_PERIOD: f64 = 0.5;

/// Length of the launch line that must be clear for a player grace period.
pub const GRACE_CLEARANCE_DISTANCE: f64 = 128.0;

// --- Designators ---

/// Stand-off of the chase position behind the hit surface (units).
pub const CHASE_STANDOFF: f64 = 10.0;

pub const DESIGNATOR_INITIAL_SCALE: f64 = 0.5;

pub const DESIGNATOR_FIRST_THINK_DELAY: f64 = 0.1;

pub const DESIGNATOR_THINK_INTERVAL: f64 = 0.05;

/// Owner distance mapped onto `DESIGNATOR_SCALE_NEAR..DESIGNATOR_SCALE_FAR`.
pub const DESIGNATOR_SCALE_DIST_NEAR: f64 = 32.0;
pub const DESIGNATOR_SCALE_DIST_FAR: f64 = 1024.0;
pub const DESIGNATOR_SCALE_NEAR: f64 = 0.01;
pub const DESIGNATOR_SCALE_FAR: f64 = 0.5;

/// Relative jitter applied to the scale each think.
pub const DESIGNATOR_SCALE_JITTER: f64 = 0.25;

pub const DESIGNATOR_SCALE_MIN: f64 = 0.1;
pub const DESIGNATOR_SCALE_MAX: f64 = 32.0;

// --- Launcher ---

/// Muzzle offset from the controller's shoot position: forward, right, up.
pub const MUZZLE_OFFSET: (f64, f64, f64) = (12.0, 6.0, -3.0);

/// Radius of the combat sound emitted on launch.
pub const LAUNCH_SOUND_RADIUS: f64 = 1000.0;
