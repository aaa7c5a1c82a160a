//! The snowflake particle record.

use crate::pile::MAX_COORD;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A single snowflake.
///
/// While `active`, a flake falls by `fall_speed` each tick and sways sideways
/// by `sin(phase_angle)`. Once it lands it is marked inactive and its position
/// is frozen where it touched the pile surface. Only a shake (or recycling
/// by a spawn) makes it active again.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    /// Drives lateral drift; grows by `rotation_speed` every tick.
    pub phase_angle: f64,
    pub fall_speed: f64,
    pub rotation_speed: f64,
    /// `true` while falling, `false` once settled.
    pub active: bool,
}

impl Particle {
    /// A falling flake with the given dynamics.
    pub fn new(position: DVec2, fall_speed: f64, phase_angle: f64, rotation_speed: f64) -> Self {
        Self {
            position,
            phase_angle,
            fall_speed,
            rotation_speed,
            active: true,
        }
    }

    /// A flake that falls straight down without swaying.
    pub fn straight(position: DVec2, fall_speed: f64) -> Self {
        Self::new(position, fall_speed, 0.0, 0.0)
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.active
    }

    /// Integrate one step of free fall. Drift never carries `x` past
    /// `±MAX_COORD`.
    #[inline]
    pub(crate) fn integrate(&mut self, drift_amplitude: f64) {
        debug_assert!(self.active, "integrating a settled particle");
        self.position.y += self.fall_speed;
        self.position.x += self.phase_angle.sin() * drift_amplitude;
        self.position.x = self.position.x.clamp(-MAX_COORD, MAX_COORD);
        self.phase_angle += self.rotation_speed;
    }

    /// Freeze the flake at `surface`.
    #[inline]
    pub(crate) fn land(&mut self, surface: f64) {
        self.position.y = surface;
        self.active = false;
    }
}
