//! Read-only per-frame view for renderers.
//!
//! A [`Frame`] borrows the simulator for exactly one frame: it cannot outlive
//! the next `tick`. Renderers either walk it directly or pack it into
//! GPU-ready vertex data with [`Frame::flake_vertices`] and
//! [`Frame::pile_columns`].
//!
//! ```ignore
//! sim.tick(dt);
//! let frame = sim.frame();
//! let flakes = frame.flake_vertices();
//! queue.write_buffer(&flake_buffer, 0, bytemuck::cast_slice(&flakes));
//! ```

use crate::particle::Particle;
use crate::pile::PileMap;
use glam::Vec2;

/// One falling flake, packed for a point or instanced-quad renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlakeVertex {
    pub position: Vec2,
}

/// One pile column: a bar from `ground` up to `ground - height`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PileColumn {
    pub x: f32,
    pub ground: f32,
    pub height: f32,
    _pad: f32,
}

impl PileColumn {
    pub fn new(x: f32, ground: f32, height: f32) -> Self {
        Self {
            x,
            ground,
            height,
            _pad: 0.0,
        }
    }

    /// Y coordinate of the top of the column.
    #[inline]
    pub fn top(&self) -> f32 {
        self.ground - self.height
    }
}

/// Borrowed snapshot of the simulator state.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    particles: &'a [Particle],
    pile: &'a PileMap,
    ground_level: f64,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(particles: &'a [Particle], pile: &'a PileMap, ground_level: f64) -> Self {
        Self {
            particles,
            pile,
            ground_level,
        }
    }

    /// Every particle, falling or settled.
    #[inline]
    pub fn particles(&self) -> &'a [Particle] {
        self.particles
    }

    /// Only the flakes still in the air.
    pub fn falling(&self) -> impl Iterator<Item = &'a Particle> + 'a {
        self.particles.iter().filter(|p| p.active)
    }

    /// `(bin, height)` pairs, ascending by bin.
    pub fn pile(&self) -> impl Iterator<Item = (i64, f64)> + 'a {
        self.pile.iter()
    }

    #[inline]
    pub fn ground_level(&self) -> f64 {
        self.ground_level
    }

    /// Falling flakes as packed vertices. Settled snow is drawn from the pile.
    pub fn flake_vertices(&self) -> Vec<FlakeVertex> {
        self.falling()
            .map(|p| FlakeVertex {
                position: p.position.as_vec2(),
            })
            .collect()
    }

    /// Pile bins as packed columns.
    pub fn pile_columns(&self) -> Vec<PileColumn> {
        let ground = self.ground_level as f32;
        self.pile
            .iter()
            .map(|(bin, height)| PileColumn::new(bin as f32, ground, height as f32))
            .collect()
    }
}
