//! Error types for snowpile.
//!
//! The simulation itself never fails at runtime. The only fallible surface is
//! configuration: building a [`SnowConfig`](crate::SnowConfig), loading one
//! from JSON, and changing the field bounds.

use std::fmt;

/// Errors that can occur while validating or loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A `min..max` span is non-finite, negative, or empty.
    InvalidRange {
        /// Name of the offending setting.
        name: &'static str,
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },
    /// Capacity must allow at least one particle.
    ZeroCapacity,
    /// More initial particles were requested than the field can hold.
    InitialCountExceedsCapacity {
        /// Requested initial particle count.
        initial: usize,
        /// Configured capacity.
        capacity: usize,
    },
    /// Settle increment must be finite and strictly positive.
    InvalidIncrement(f64),
    /// Field bounds must be finite and strictly positive.
    InvalidBounds {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// A scalar setting is non-finite or negative.
    InvalidScalar {
        /// Name of the offending setting.
        name: &'static str,
        /// Value as given.
        value: f64,
    },
    /// Spawn batches must contain at least one particle.
    ZeroSpawnBatch,
    /// Failed to parse or serialize JSON.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRange { name, min, max } => write!(
                f,
                "Invalid range for {}: {}..{} (bounds must be finite with 0 <= min < max)",
                name, min, max
            ),
            ConfigError::ZeroCapacity => write!(f, "Particle capacity must be at least 1"),
            ConfigError::InitialCountExceedsCapacity { initial, capacity } => write!(
                f,
                "Initial particle count {} exceeds capacity {}",
                initial, capacity
            ),
            ConfigError::InvalidIncrement(value) => write!(
                f,
                "Settle increment must be finite and greater than zero, got {}",
                value
            ),
            ConfigError::InvalidBounds { width, height } => write!(
                f,
                "Field bounds must be finite and positive, got {}x{}",
                width, height
            ),
            ConfigError::InvalidScalar { name, value } => write!(
                f,
                "Invalid value for {}: {} (must be finite and non-negative)",
                name, value
            ),
            ConfigError::ZeroSpawnBatch => write!(f, "Spawn batch size must be at least 1"),
            ConfigError::Json(e) => write!(f, "Invalid configuration JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
