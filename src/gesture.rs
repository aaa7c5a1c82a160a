//! Continuous spawning while a pointer is held.
//!
//! [`SpawnGesture`] is a small state machine the driver feeds with pointer
//! events and frame time. It emits a batch when the pointer goes down, then
//! another batch every `interval` for as long as it stays down, always at the
//! latest pointer position.
//!
//! ```ignore
//! let mut gesture = SpawnGesture::from_config(sim.config());
//! // pointer down
//! if let Some(req) = gesture.press(x, y) { sim.apply(req); }
//! // every frame
//! if let Some(req) = gesture.advance(dt) { sim.apply(req); }
//! ```

use crate::config::SnowConfig;
use glam::DVec2;
use std::time::Duration;

/// A batch of flakes to launch from one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub position: DVec2,
    pub count: usize,
}

/// Pointer-held spawn cadence.
#[derive(Clone, Debug)]
pub struct SpawnGesture {
    batch: usize,
    interval: Duration,
    pointer: Option<DVec2>,
    /// Time held since the last emitted batch.
    since_batch: Duration,
}

impl SpawnGesture {
    pub fn new(batch: usize, interval: Duration) -> Self {
        Self {
            batch,
            interval,
            pointer: None,
            since_batch: Duration::ZERO,
        }
    }

    pub fn from_config(config: &SnowConfig) -> Self {
        Self::new(config.spawn_batch, config.spawn_interval())
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.pointer.is_some()
    }

    #[inline]
    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
    }

    /// Pointer down. Emits the first batch immediately. Non-finite
    /// coordinates are ignored.
    pub fn press(&mut self, x: f64, y: f64) -> Option<SpawnRequest> {
        let position = DVec2::new(x, y);
        if !position.is_finite() {
            return None;
        }
        self.pointer = Some(position);
        self.since_batch = Duration::ZERO;
        self.request(position, 1)
    }

    /// Pointer moved. Only tracked while held; non-finite moves keep the
    /// previous position.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let position = DVec2::new(x, y);
        if let Some(pointer) = self.pointer.as_mut() {
            if position.is_finite() {
                *pointer = position;
            }
        }
    }

    pub fn release(&mut self) {
        self.pointer = None;
        self.since_batch = Duration::ZERO;
    }

    /// Account for `dt` of held time. When one or more intervals have
    /// elapsed, returns a single request covering all of them.
    pub fn advance(&mut self, dt: Duration) -> Option<SpawnRequest> {
        let position = self.pointer?;
        if self.interval.is_zero() {
            return self.request(position, 1);
        }

        self.since_batch += dt;
        let mut batches = 0;
        while self.since_batch >= self.interval {
            self.since_batch -= self.interval;
            batches += 1;
        }
        self.request(position, batches)
    }

    fn request(&self, position: DVec2, batches: usize) -> Option<SpawnRequest> {
        let count = self.batch * batches;
        (count > 0).then_some(SpawnRequest { position, count })
    }
}
