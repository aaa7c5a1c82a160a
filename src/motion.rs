//! Shake detection from device-motion samples.
//!
//! Motion APIs report linear acceleration per axis, and any axis may be
//! missing. [`ShakeDetector`] turns one sample into a yes/no decision; the
//! simulator applies the shake itself.

use glam::DVec3;

/// A single acceleration reading. Missing axes read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionSample {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl MotionSample {
    /// Sample with all three axes present.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    pub fn from_vec(acceleration: DVec3) -> Self {
        Self::new(acceleration.x, acceleration.y, acceleration.z)
    }

    /// Acceleration with missing axes filled in as zero.
    pub fn acceleration(&self) -> DVec3 {
        DVec3::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.z.unwrap_or(0.0),
        )
    }
}

/// Flags a sample as a shake when the magnitude on any single axis is
/// strictly greater than the threshold. NaN axes never trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShakeDetector {
    threshold: f64,
}

impl ShakeDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_shake(&self, sample: &MotionSample) -> bool {
        let a = sample.acceleration().abs();
        a.x > self.threshold || a.y > self.threshold || a.z > self.threshold
    }
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(15.0)
    }
}
