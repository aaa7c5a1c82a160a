//! The particle field simulator.

use crate::config::{FieldBounds, SnowConfig, SpawnPolicy};
use crate::error::ConfigError;
use crate::frame::Frame;
use crate::gesture::SpawnRequest;
use crate::motion::{MotionSample, ShakeDetector};
use crate::particle::Particle;
use crate::pile::{bin_for, in_range, PileMap};
use crate::scatter::Scatter;
use glam::DVec2;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Result of one [`Simulator::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Flakes that were falling at the start of the tick.
    pub moved: usize,
    /// Flakes that landed during the tick.
    pub settled: usize,
}

/// Outcome of a [`Simulator::spawn_at`] call.
///
/// `spawned + recycled + rejected` always equals the requested count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// New particles appended below capacity.
    pub spawned: usize,
    /// Settled particles reused at capacity.
    pub recycled: usize,
    /// Requests dropped: no room, or out-of-range coordinates.
    pub rejected: usize,
}

impl SpawnReport {
    /// Particles that are now falling from the requested point.
    #[inline]
    pub fn launched(&self) -> usize {
        self.spawned + self.recycled
    }
}

/// Owns every flake and the ground pile, and advances them one tick at a time.
///
/// The driver calls [`tick`](Self::tick) once per frame, reads a
/// [`frame`](Self::frame) to draw, and forwards gestures as
/// [`on_shake`](Self::on_shake) and [`spawn_at`](Self::spawn_at) between
/// ticks. All mutation goes through `&mut self`, so a shake can never be
/// observed half-applied by a tick.
///
/// # Capacity
///
/// The particle list never grows past `capacity`. Below capacity, spawns
/// append. At capacity under [`SpawnPolicy::RecycleSettled`] the oldest
/// settled flake is reused; when every flake is still falling, or under
/// [`SpawnPolicy::Reject`], the spawn is rejected.
///
/// # Settled flakes
///
/// The pile map is the authoritative picture of settled snow. A settled
/// flake keeps its frozen landing position but is skipped by `tick`, left out
/// of [`Frame::flake_vertices`], and may be recycled.
pub struct Simulator {
    config: SnowConfig,
    bounds: FieldBounds,
    particles: Vec<Particle>,
    pile: PileMap,
    scatter: Scatter,
    detector: ShakeDetector,
    /// Indices of settled particles, oldest first.
    settled: VecDeque<usize>,
    ticks: u64,
    elapsed: f64,
    shakes: u64,
}

impl Simulator {
    /// Validate `config` and scatter `initial_count` flakes above the field.
    pub fn new(config: SnowConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut scatter = Scatter::new(config.fall_speed, config.rotation_speed, config.seed);
        let bounds = config.bounds;
        let mut particles = Vec::with_capacity(config.capacity);
        particles.extend((0..config.initial_count).map(|_| scatter.flake_above(bounds)));

        debug!(
            capacity = config.capacity,
            initial = config.initial_count,
            width = bounds.width,
            height = bounds.height,
            "snow field created"
        );

        Ok(Self {
            pile: PileMap::new(config.settle_increment),
            detector: ShakeDetector::new(config.shake_threshold),
            bounds,
            particles,
            scatter,
            settled: VecDeque::new(),
            ticks: 0,
            elapsed: 0.0,
            shakes: 0,
            config,
        })
    }

    /// Advance every falling flake by one step and settle those that reach
    /// the pile surface.
    ///
    /// `dt_hint` is the frame time in seconds. Motion is per tick, so it only
    /// feeds [`elapsed`](Self::elapsed); non-finite or negative hints are
    /// ignored.
    pub fn tick(&mut self, dt_hint: f64) -> TickStats {
        let ground = self.bounds.ground_level();
        let drift = self.config.drift_amplitude;
        let mut stats = TickStats::default();

        // Settlement reads and writes the pile, so flakes are processed one at
        // a time in index order.
        for (index, particle) in self.particles.iter_mut().enumerate() {
            if !particle.active {
                continue;
            }
            stats.moved += 1;
            particle.integrate(drift);

            let surface = ground - self.pile.height(bin_for(particle.position.x));
            if particle.position.y >= surface {
                particle.land(surface);
                let grown = self.pile.settle(particle.position.x);
                self.settled.push_back(index);
                stats.settled += 1;
                trace!(index, x = particle.position.x, bin = grown, "flake settled");
            }
        }

        self.ticks += 1;
        if dt_hint.is_finite() && dt_hint >= 0.0 {
            self.elapsed += dt_hint;
        }
        debug_assert!(self.settled.len() <= self.particles.len());
        stats
    }

    /// Height of the pile at `bin`, or zero if nothing has settled there.
    #[inline]
    pub fn pile_height(&self, bin: i64) -> f64 {
        self.pile.height(bin)
    }

    /// Add one flake's worth of snow landing at `x`, using the pile's
    /// compaction rule. Returns the bin that grew, or `None` when `x` is
    /// non-finite or beyond `±MAX_COORD`.
    pub fn settle(&mut self, x: f64) -> Option<i64> {
        if !in_range(x) {
            warn!(x, "ignoring settle at out-of-range x");
            return None;
        }
        Some(self.pile.settle(x))
    }

    /// Clear every pile and relaunch every flake from a random point inside
    /// the field, settled or not.
    pub fn on_shake(&mut self) {
        self.pile.clear();
        self.settled.clear();
        let bounds = self.bounds;
        for particle in &mut self.particles {
            self.scatter.relaunch(particle, bounds);
        }
        self.shakes += 1;
        debug!(particles = self.particles.len(), shakes = self.shakes, "shake applied");
    }

    /// Feed a device-motion sample. Applies a shake and returns `true` when
    /// any axis exceeds the configured threshold.
    pub fn on_motion(&mut self, sample: MotionSample) -> bool {
        if self.detector.is_shake(&sample) {
            self.on_shake();
            true
        } else {
            false
        }
    }

    /// Launch `count` fresh flakes from `(x, y)`.
    ///
    /// Non-finite coordinates, or ones beyond `±MAX_COORD`, reject the whole
    /// request. See the type-level docs for the capacity policy.
    pub fn spawn_at(&mut self, x: f64, y: f64, count: usize) -> SpawnReport {
        let mut report = SpawnReport::default();
        if count == 0 {
            return report;
        }
        if !(in_range(x) && in_range(y)) {
            warn!(x, y, count, "rejecting spawn at out-of-range position");
            report.rejected = count;
            return report;
        }

        let position = DVec2::new(x, y);
        for requested in 0..count {
            if self.particles.len() < self.config.capacity {
                let flake = self.scatter.flake_at(position);
                self.particles.push(flake);
                report.spawned += 1;
            } else if let Some(index) = self.recycle_slot() {
                self.particles[index] = self.scatter.flake_at(position);
                report.recycled += 1;
            } else {
                report.rejected = count - requested;
                break;
            }
        }

        if report.rejected > 0 {
            debug!(
                rejected = report.rejected,
                capacity = self.config.capacity,
                policy = ?self.config.spawn_policy,
                "spawn hit capacity"
            );
        }
        report
    }

    /// Forward a pointer-gesture batch to [`spawn_at`](Self::spawn_at).
    pub fn apply(&mut self, request: SpawnRequest) -> SpawnReport {
        self.spawn_at(request.position.x, request.position.y, request.count)
    }

    /// Add a prepared particle. Returns `false` (and drops it) when the field
    /// is full, the particle has non-finite state, or its position is beyond
    /// `±MAX_COORD`.
    pub fn insert(&mut self, particle: Particle) -> bool {
        let finite = in_range(particle.position.x)
            && in_range(particle.position.y)
            && particle.fall_speed.is_finite()
            && particle.phase_angle.is_finite()
            && particle.rotation_speed.is_finite();
        if !finite {
            warn!(?particle, "rejecting particle with out-of-range state");
            return false;
        }
        if self.particles.len() >= self.config.capacity {
            return false;
        }
        if !particle.active {
            self.settled.push_back(self.particles.len());
        }
        self.particles.push(particle);
        true
    }

    /// Resize the field. Ground level and the shake scatter area follow the
    /// new bounds; existing flakes and pile bins are kept as they are.
    pub fn set_field_bounds(&mut self, width: f64, height: f64) -> Result<(), ConfigError> {
        let bounds = FieldBounds::new(width, height);
        if let Err(e) = bounds.validate() {
            warn!(width, height, "rejecting invalid field bounds");
            return Err(e);
        }
        debug!(width, height, "field bounds changed");
        self.bounds = bounds;
        Ok(())
    }

    fn recycle_slot(&mut self) -> Option<usize> {
        match self.config.spawn_policy {
            SpawnPolicy::RecycleSettled => {
                let index = self.settled.pop_front()?;
                debug_assert!(!self.particles[index].active, "recycling a falling flake");
                Some(index)
            }
            SpawnPolicy::Reject => None,
        }
    }

    /// Borrow the current state for rendering.
    pub fn frame(&self) -> Frame<'_> {
        Frame::new(&self.particles, &self.pile, self.bounds.ground_level())
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn pile(&self) -> &PileMap {
        &self.pile
    }

    #[inline]
    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    #[inline]
    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    #[inline]
    pub fn ground_level(&self) -> f64 {
        self.bounds.ground_level()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    #[inline]
    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.particles.len() - self.settled.len()
    }

    /// Ticks run since construction.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sum of the `dt_hint`s passed to `tick`, in seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn shakes(&self) -> u64 {
        self.shakes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(capacity: usize) -> Simulator {
        let config = SnowConfig::default()
            .with_capacity(capacity)
            .with_initial_count(0)
            .with_bounds(200.0, 100.0)
            .with_seed(1);
        Simulator::new(config).unwrap()
    }

    #[test]
    fn test_new_scatters_initial_flakes() {
        let config = SnowConfig::default().with_capacity(300).with_seed(5);
        let sim = Simulator::new(config).unwrap();
        assert_eq!(sim.len(), 300);
        assert_eq!(sim.active_count(), 300);
        assert!(sim.particles().iter().all(|p| p.position.y < 0.0));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SnowConfig::default().with_capacity(0);
        assert!(matches!(Simulator::new(config), Err(ConfigError::ZeroCapacity)));
    }

    #[test]
    fn test_settled_flakes_are_skipped() {
        let mut sim = empty(4);
        sim.insert(Particle::straight(DVec2::new(10.0, 99.0), 1.0));
        sim.tick(0.016);
        let frozen = sim.particles()[0];
        assert!(!frozen.active);
        for _ in 0..10 {
            sim.tick(0.016);
        }
        assert_eq!(sim.particles()[0], frozen);
    }

    #[test]
    fn test_landing_on_pile_surface() {
        let mut sim = empty(4);
        sim.settle(10.0); // bin 9
        sim.settle(10.0); // bin 11
        sim.settle(10.0); // bin 10
        assert_eq!(sim.pile_height(10), 4.0);

        sim.insert(Particle::straight(DVec2::new(10.0, 90.0), 3.0));
        for _ in 0..3 {
            sim.tick(0.0);
        }
        let p = sim.particles()[0];
        assert!(!p.active);
        assert_eq!(p.position.y, 96.0);
    }

    #[test]
    fn test_settle_rejects_nan() {
        let mut sim = empty(4);
        assert_eq!(sim.settle(f64::NAN), None);
        assert!(sim.pile().is_empty());
    }

    #[test]
    fn test_huge_coordinates_rejected() {
        let mut sim = empty(4);
        let report = sim.spawn_at(1e19, 99.5, 1);
        assert_eq!(report, SpawnReport { spawned: 0, recycled: 0, rejected: 1 });
        assert_eq!(sim.spawn_at(0.0, -f64::MAX, 2).rejected, 2);
        sim.tick(0.0);

        assert_eq!(sim.settle(f64::MAX), None);
        assert_eq!(sim.settle(-1e19), None);
        assert!(!sim.insert(Particle::straight(DVec2::new(1e19, 0.0), 1.0)));
        assert!(sim.is_empty());
        assert!(sim.pile().is_empty());
    }

    #[test]
    fn test_flake_at_coordinate_limit_settles() {
        let mut sim = empty(4);
        let edge = crate::pile::MAX_COORD;
        assert!(sim.insert(Particle::new(DVec2::new(edge, 99.5), 1.0, std::f64::consts::FRAC_PI_2, 0.0)));
        sim.tick(0.0);

        let flake = sim.particles()[0];
        assert!(!flake.active);
        assert_eq!(flake.position.x, edge);
        assert_eq!(sim.pile().total_layers(), 1);
    }

    #[test]
    fn test_spawn_zero_is_noop() {
        let mut sim = empty(4);
        assert_eq!(sim.spawn_at(1.0, 1.0, 0), SpawnReport::default());
        assert!(sim.is_empty());
    }

    #[test]
    fn test_spawn_non_finite_rejected() {
        let mut sim = empty(4);
        let report = sim.spawn_at(f64::NAN, 0.0, 3);
        assert_eq!(report.rejected, 3);
        assert!(sim.is_empty());
        let report = sim.spawn_at(0.0, f64::INFINITY, 2);
        assert_eq!(report.rejected, 2);
    }

    #[test]
    fn test_recycle_oldest_settled_first() {
        let mut sim = empty(3);
        sim.insert(Particle::straight(DVec2::new(10.0, 0.0), 1.0));
        sim.insert(Particle::straight(DVec2::new(50.0, 99.5), 1.0));
        sim.insert(Particle::straight(DVec2::new(90.0, 98.5), 1.0));
        // Flake 1 lands on the first tick, flake 2 on the second.
        sim.tick(0.0);
        sim.tick(0.0);
        assert_eq!(sim.settled_count(), 2);

        let report = sim.spawn_at(5.0, 5.0, 1);
        assert_eq!(report, SpawnReport { spawned: 0, recycled: 1, rejected: 0 });
        assert_eq!(sim.particles()[1].position, DVec2::new(5.0, 5.0));
        assert!(sim.particles()[1].active);
        assert!(!sim.particles()[2].active);
        assert_eq!(sim.len(), 3);
    }

    #[test]
    fn test_rejects_when_all_falling() {
        let mut sim = empty(2);
        let report = sim.spawn_at(5.0, 5.0, 5);
        assert_eq!(report, SpawnReport { spawned: 2, recycled: 0, rejected: 3 });
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn test_reject_policy_never_recycles() {
        let config = SnowConfig::default()
            .with_capacity(1)
            .with_initial_count(0)
            .with_bounds(200.0, 100.0)
            .with_spawn_policy(SpawnPolicy::Reject)
            .with_seed(1);
        let mut sim = Simulator::new(config).unwrap();
        sim.insert(Particle::straight(DVec2::new(10.0, 99.5), 1.0));
        sim.tick(0.0);
        assert_eq!(sim.settled_count(), 1);
        let report = sim.spawn_at(5.0, 5.0, 1);
        assert_eq!(report.rejected, 1);
        assert!(!sim.particles()[0].active);
    }

    #[test]
    fn test_insert_respects_capacity_and_finiteness() {
        let mut sim = empty(1);
        assert!(!sim.insert(Particle::straight(DVec2::new(f64::NAN, 0.0), 1.0)));
        assert!(sim.insert(Particle::straight(DVec2::ZERO, 1.0)));
        assert!(!sim.insert(Particle::straight(DVec2::ZERO, 1.0)));
    }

    #[test]
    fn test_bounds_change_keeps_state() {
        let mut sim = empty(4);
        sim.settle(150.0);
        sim.insert(Particle::straight(DVec2::new(150.0, 10.0), 1.0));
        sim.set_field_bounds(100.0, 50.0).unwrap();
        assert_eq!(sim.ground_level(), 50.0);
        assert_eq!(sim.pile_height(149), 4.0);
        assert_eq!(sim.particles()[0].position, DVec2::new(150.0, 10.0));

        assert!(sim.set_field_bounds(f64::NAN, 10.0).is_err());
        assert!(sim.set_field_bounds(-1.0, 10.0).is_err());
        assert_eq!(sim.bounds(), FieldBounds::new(100.0, 50.0));
    }

    #[test]
    fn test_elapsed_ignores_bad_hints() {
        let mut sim = empty(1);
        sim.tick(0.5);
        sim.tick(f64::NAN);
        sim.tick(-1.0);
        assert_eq!(sim.ticks(), 3);
        assert_eq!(sim.elapsed(), 0.5);
    }

    #[test]
    fn test_on_motion_threshold() {
        let mut sim = empty(4);
        sim.settle(10.0);
        assert!(!sim.on_motion(MotionSample::new(15.0, 0.0, 0.0)));
        assert!(!sim.pile().is_empty());
        assert!(sim.on_motion(MotionSample::new(0.0, -15.5, 0.0)));
        assert!(sim.pile().is_empty());
        assert_eq!(sim.shakes(), 1);
    }
}
