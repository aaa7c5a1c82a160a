//! Frame pacing for drivers.
//!
//! Display callbacks can fire faster than the simulation should step. A
//! [`FramePacer`] lets a frame through only when at least the minimum
//! interval has passed since the last accepted one, and keeps frame and FPS
//! counters for accepted frames.
//!
//! # Example
//!
//! ```ignore
//! let mut pacer = FramePacer::from_config(sim.config());
//!
//! // In the display callback:
//! if let Some(dt) = pacer.poll() {
//!     sim.tick(dt.as_secs_f64());
//!     draw(sim.frame());
//! }
//! ```

use crate::config::SnowConfig;
use std::time::{Duration, Instant};

/// Throttles a display callback down to simulation frames.
#[derive(Debug)]
pub struct FramePacer {
    /// Minimum gap between accepted frames.
    min_interval: Duration,
    /// When the last frame was accepted.
    last_frame: Option<Instant>,
    /// Accepted frames since start.
    frame_count: u64,
    /// Calls rejected for arriving too early.
    skipped: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Option<Instant>,
    fps_update_interval: Duration,
    paused: bool,
}

impl FramePacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_frame: None,
            frame_count: 0,
            skipped: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: None,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
        }
    }

    pub fn from_config(config: &SnowConfig) -> Self {
        Self::new(config.min_frame_interval())
    }

    /// Poll with the current time. See [`poll_at`](Self::poll_at).
    pub fn poll(&mut self) -> Option<Duration> {
        self.poll_at(Instant::now())
    }

    /// Returns the time since the previous accepted frame if a frame may run
    /// at `now`, or `None` if it is too early or the pacer is paused. The
    /// first accepted frame reports a zero delta.
    pub fn poll_at(&mut self, now: Instant) -> Option<Duration> {
        if self.paused {
            return None;
        }

        let delta = match self.last_frame {
            Some(last) => {
                let since = now.saturating_duration_since(last);
                if since < self.min_interval {
                    self.skipped += 1;
                    return None;
                }
                since
            }
            None => Duration::ZERO,
        };

        self.last_frame = Some(now);
        self.frame_count += 1;
        self.update_fps(now);
        Some(delta)
    }

    fn update_fps(&mut self, now: Instant) {
        let Some(since) = self.fps_update_time else {
            self.fps_update_time = Some(now);
            self.fps_frame_count = self.frame_count;
            return;
        };
        let fps_elapsed = now.saturating_duration_since(since);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = Some(now);
        }
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop accepting frames.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Accept frames again. The next frame reports a zero delta so paused
    /// time is not fed into the simulation.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_frame = None;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}
