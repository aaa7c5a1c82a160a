//! Simulation configuration.
//!
//! Every tunable of the simulator lives in [`SnowConfig`]. Defaults match a
//! full-screen snow globe: 7000 flakes, a 4-unit settle increment and a shake
//! threshold of 15 on the accelerometer scale.
//!
//! # Example
//!
//! ```ignore
//! let config = SnowConfig::default()
//!     .with_capacity(2_000)
//!     .with_bounds(1280.0, 720.0)
//!     .with_fall_speed(1.0, 3.0)
//!     .with_seed(7);
//! let sim = Simulator::new(config)?;
//! ```
//!
//! Configs round-trip through JSON, and missing keys fall back to defaults:
//!
//! ```ignore
//! let config = SnowConfig::from_json(r#"{ "capacity": 500, "initial_count": 500 }"#)?;
//! ```

use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Half-open numeric range `min..max` used for randomized particle properties.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a uniform sample from `min..max`.
    #[inline]
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let ok = self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min < self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Width and height of the visible field.
///
/// `height` doubles as the ground level: flakes fall toward `y = height`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldBounds {
    pub width: f64,
    pub height: f64,
}

impl FieldBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Ground level, in the same coordinates as particle positions.
    #[inline]
    pub fn ground_level(&self) -> f64 {
        self.height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// What `spawn_at` does once the particle list is full.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpawnPolicy {
    /// Reuse the oldest settled particle. Spawns are rejected only when every
    /// particle is still falling.
    #[default]
    RecycleSettled,
    /// Reject every spawn beyond capacity.
    Reject,
}

/// Full simulator configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SnowConfig {
    /// Maximum number of particles the simulator will hold.
    pub capacity: usize,
    /// Particles scattered above the field at construction.
    pub initial_count: usize,
    pub bounds: FieldBounds,
    /// Vertical speed per tick.
    pub fall_speed: Span,
    /// Phase-angle increment per tick.
    pub rotation_speed: Span,
    /// Lateral drift per tick is `sin(phase_angle) * drift_amplitude`.
    pub drift_amplitude: f64,
    /// Height added to a pile bin per settled particle.
    pub settle_increment: f64,
    /// Acceleration magnitude (any axis) that counts as a shake.
    pub shake_threshold: f64,
    /// Particles per pointer-spawn batch.
    pub spawn_batch: usize,
    /// Interval between pointer-spawn batches, in milliseconds.
    pub spawn_interval_ms: u64,
    /// Minimum time between accepted frames, in milliseconds.
    pub min_frame_interval_ms: u64,
    pub spawn_policy: SpawnPolicy,
    /// RNG seed. `None` seeds from the system clock.
    pub seed: Option<u64>,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            capacity: 7000,
            initial_count: 7000,
            bounds: FieldBounds::default(),
            fall_speed: Span::new(0.5, 2.0),
            rotation_speed: Span::new(0.02, 0.07),
            drift_amplitude: 0.5,
            settle_increment: 4.0,
            shake_threshold: 15.0,
            spawn_batch: 10,
            spawn_interval_ms: 50,
            min_frame_interval_ms: 16,
            spawn_policy: SpawnPolicy::RecycleSettled,
            seed: None,
        }
    }
}

impl SnowConfig {
    /// Set the capacity. `initial_count` is lowered to fit if needed.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self.initial_count = self.initial_count.min(capacity);
        self
    }

    pub fn with_initial_count(mut self, count: usize) -> Self {
        self.initial_count = count;
        self
    }

    pub fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.bounds = FieldBounds::new(width, height);
        self
    }

    pub fn with_fall_speed(mut self, min: f64, max: f64) -> Self {
        self.fall_speed = Span::new(min, max);
        self
    }

    pub fn with_rotation_speed(mut self, min: f64, max: f64) -> Self {
        self.rotation_speed = Span::new(min, max);
        self
    }

    pub fn with_drift_amplitude(mut self, amplitude: f64) -> Self {
        self.drift_amplitude = amplitude;
        self
    }

    pub fn with_settle_increment(mut self, increment: f64) -> Self {
        self.settle_increment = increment;
        self
    }

    pub fn with_shake_threshold(mut self, threshold: f64) -> Self {
        self.shake_threshold = threshold;
        self
    }

    /// Set the pointer-spawn batch size and cadence.
    pub fn with_spawn_cadence(mut self, batch: usize, interval: Duration) -> Self {
        self.spawn_batch = batch;
        self.spawn_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_min_frame_interval(mut self, interval: Duration) -> Self {
        self.min_frame_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_spawn_policy(mut self, policy: SpawnPolicy) -> Self {
        self.spawn_policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    #[inline]
    pub fn min_frame_interval(&self) -> Duration {
        Duration::from_millis(self.min_frame_interval_ms)
    }

    /// Check every setting, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.initial_count > self.capacity {
            return Err(ConfigError::InitialCountExceedsCapacity {
                initial: self.initial_count,
                capacity: self.capacity,
            });
        }
        self.bounds.validate()?;
        self.fall_speed.validate("fall_speed")?;
        self.rotation_speed.validate("rotation_speed")?;
        check_scalar("drift_amplitude", self.drift_amplitude)?;
        check_scalar("shake_threshold", self.shake_threshold)?;
        if !(self.settle_increment.is_finite() && self.settle_increment > 0.0) {
            return Err(ConfigError::InvalidIncrement(self.settle_increment));
        }
        if self.spawn_batch == 0 {
            return Err(ConfigError::ZeroSpawnBatch);
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SnowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_scalar(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidScalar { name, value })
    }
}
