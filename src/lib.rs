//! # snowpile - falling snow that piles up
//!
//! A small simulation core for "snow globe" effects: flakes sway down a 2D
//! field, land on the ground or on snow that is already there, and build up
//! sloped piles. A shake clears the piles and throws every flake back into
//! the air; a held pointer can keep adding flakes.
//!
//! snowpile owns no window, canvas or GPU state. A driver steps the
//! [`Simulator`] once per frame, hands the borrowed [`Frame`] to whatever
//! renderer it uses, and forwards gestures as plain method calls.
//!
//! ## Quick Start
//!
//! ```ignore
//! use snowpile::prelude::*;
//!
//! let mut sim = Simulator::new(SnowConfig::default().with_bounds(1280.0, 720.0))?;
//! let mut pacer = FramePacer::from_config(sim.config());
//!
//! loop {
//!     if let Some(dt) = pacer.poll() {
//!         sim.tick(dt.as_secs_f64());
//!         let frame = sim.frame();
//!         draw_flakes(&frame.flake_vertices());
//!         draw_pile(&frame.pile_columns());
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Flakes
//!
//! Each [`Particle`] falls at a constant speed and drifts sideways by
//! `sin(phase_angle) * drift_amplitude`, with the phase advancing every tick.
//! When it reaches the pile surface under it, it settles: it is frozen in
//! place and one increment of snow is added to the [`PileMap`].
//!
//! ### Piles
//!
//! The pile map stores a height per integer column. A landing flake grows
//! the lowest of its column and the two neighbours, preferring left, then
//! right, then the column itself, which makes heaps slope outward.
//!
//! ### Gestures
//!
//! | Gesture | Helper | Simulator call |
//! |---------|--------|----------------|
//! | Device shake | [`ShakeDetector`] | [`Simulator::on_motion`] / [`Simulator::on_shake`] |
//! | Pointer held | [`SpawnGesture`] | [`Simulator::apply`] / [`Simulator::spawn_at`] |
//! | Resize | - | [`Simulator::set_field_bounds`] |

pub mod config;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod motion;
pub mod pacing;
mod particle;
pub mod pile;
mod scatter;
mod simulator;

pub use config::{FieldBounds, SnowConfig, Span, SpawnPolicy};
pub use error::ConfigError;
pub use frame::{FlakeVertex, Frame, PileColumn};
pub use gesture::{SpawnGesture, SpawnRequest};
pub use glam::{DVec2, DVec3, Vec2};
pub use motion::{MotionSample, ShakeDetector};
pub use pacing::FramePacer;
pub use particle::Particle;
pub use pile::{bin_for, PileMap};
pub use scatter::Scatter;
pub use simulator::{Simulator, SpawnReport, TickStats};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use snowpile::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{FieldBounds, SnowConfig, Span, SpawnPolicy};
    pub use crate::error::ConfigError;
    pub use crate::frame::{FlakeVertex, Frame, PileColumn};
    pub use crate::gesture::{SpawnGesture, SpawnRequest};
    pub use crate::motion::{MotionSample, ShakeDetector};
    pub use crate::pacing::FramePacer;
    pub use crate::particle::Particle;
    pub use crate::pile::PileMap;
    pub use crate::simulator::{Simulator, SpawnReport, TickStats};
    pub use crate::{DVec2, DVec3, Vec2};
}
