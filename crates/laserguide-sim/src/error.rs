//! Simulation error types.
//!
//! Only the public engine API returns these. The tick loop never fails:
//! a missing designator, a degenerate blend or a stale zone owner are handled
//! in place, and a stalled projectile detonates itself.

use std::fmt;

use hecs::Entity;

#[derive(Debug)]
pub enum SimError {
    /// The handle does not name a live projectile.
    UnknownProjectile(Entity),
    /// The handle does not name a live designator.
    UnknownDesignator(Entity),
    /// The handle does not name a live launcher.
    UnknownLauncher(Entity),
    /// The handle does not name a live entity at all.
    UnknownEntity(Entity),
    /// Zone radius must be finite and positive.
    InvalidZone { radius: f64 },
    /// Grace period must be finite and non-negative.
    InvalidGracePeriod { secs: f64 },
    /// Damage amounts are never negative.
    InvalidDamage { amount: i32 },
    /// A configuration value is outside its valid range.
    InvalidConfig {
        name: &'static str,
        value: f64,
        valid_range: &'static str,
    },
    ConfigIo(std::io::Error),
    ConfigParse(toml::de::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownProjectile(e) => write!(f, "no live projectile {e:?}"),
            SimError::UnknownDesignator(e) => write!(f, "no live designator {e:?}"),
            SimError::UnknownLauncher(e) => write!(f, "no live launcher {e:?}"),
            SimError::UnknownEntity(e) => write!(f, "no live entity {e:?}"),
            SimError::InvalidZone { radius } => {
                write!(f, "forced detonation zone radius {radius} must be positive")
            }
            SimError::InvalidGracePeriod { secs } => {
                write!(f, "grace period {secs}s must be non-negative")
            }
            SimError::InvalidDamage { amount } => {
                write!(f, "damage amount {amount} must be non-negative")
            }
            SimError::InvalidConfig {
                name,
                value,
                valid_range,
            } => write!(f, "config `{name}` = {value} outside {valid_range}"),
            SimError::ConfigIo(e) => write!(f, "failed to read config: {e}"),
            SimError::ConfigParse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::ConfigIo(e) => Some(e),
            SimError::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::ConfigIo(e)
    }
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::ConfigParse(e)
    }
}
