//! Random placement and dynamics for new and relaunched flakes.
//!
//! [`Scatter`] owns the simulator's RNG and knows the configured speed ranges,
//! so callers only say *where* a flake should start.

use crate::config::{FieldBounds, Span};
use crate::particle::Particle;
use glam::DVec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Seeded generator for particle state.
pub struct Scatter {
    fall_speed: Span,
    rotation_speed: Span,
    rng: SmallRng,
}

impl Scatter {
    /// Create a scatter helper. Without a seed the RNG is seeded from the
    /// system clock, so every run differs.
    pub fn new(fall_speed: Span, rotation_speed: Span, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            fall_speed,
            rotation_speed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f64 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f64 {
        self.rng.gen()
    }

    /// A falling flake at `position` with fresh speed, phase and rotation.
    pub fn flake_at(&mut self, position: DVec2) -> Particle {
        let fall_speed = self.fall_speed.sample(&mut self.rng);
        let phase_angle = self.rng.gen_range(0.0..TAU);
        let rotation_speed = self.rotation_speed.sample(&mut self.rng);
        Particle::new(position, fall_speed, phase_angle, rotation_speed)
    }

    /// A flake somewhere in the band one field-height above the visible area,
    /// so the initial population streams in from the top.
    pub fn flake_above(&mut self, bounds: FieldBounds) -> Particle {
        let x = self.random() * bounds.width;
        let y = self.random() * bounds.height - bounds.height;
        self.flake_at(DVec2::new(x, y))
    }

    /// A flake at an integer position inside the visible field. Used to
    /// relaunch everything after a shake.
    pub fn flake_within(&mut self, bounds: FieldBounds) -> Particle {
        let x = (self.random() * bounds.width).floor();
        let y = (self.random() * bounds.height).floor();
        self.flake_at(DVec2::new(x, y))
    }

    /// Re-randomize `particle` in place as if newly created inside the field.
    pub fn relaunch(&mut self, particle: &mut Particle, bounds: FieldBounds) {
        *particle = self.flake_within(bounds);
    }
}
