//! Ground pile height-map.
//!
//! Settled snow is tracked per integer column ("bin"). Each bin stores a
//! number of layers; its height is `layers * increment`. Absent bins have
//! height zero and a bin is never stored with zero layers.
//!
//! # Compaction
//!
//! A landing flake does not simply stack on its own bin. [`PileMap::settle`]
//! looks at the bin and its two neighbours and grows whichever is lowest,
//! preferring left, then right, then the centre on ties. Piles therefore
//! spread outward from their shoulders and form sloped heaps instead of
//! one-column spikes.

use std::collections::BTreeMap;

/// Largest coordinate magnitude accepted into particle or pile state.
///
/// Within 2^52 the bin rounding `floor(x + 0.5)` stays exact, and the
/// neighbours of any bin fit in `i64`.
pub const MAX_COORD: f64 = 4_503_599_627_370_496.0;

/// Whether `value` is finite and within `±MAX_COORD`.
#[inline]
pub fn in_range(value: f64) -> bool {
    value.is_finite() && value.abs() <= MAX_COORD
}

/// Map an x coordinate to its pile bin.
///
/// Halves round toward positive infinity, so `-2.5` maps to `-2` and `2.5`
/// maps to `3`. Coordinates beyond `±MAX_COORD` clamp to the edge bin.
#[inline]
pub fn bin_for(x: f64) -> i64 {
    (x.clamp(-MAX_COORD, MAX_COORD) + 0.5).floor() as i64
}

/// Accumulated snow heights keyed by bin.
#[derive(Clone, Debug, PartialEq)]
pub struct PileMap {
    layers: BTreeMap<i64, u32>,
    increment: f64,
}

impl PileMap {
    /// Create an empty pile whose bins grow by `increment` per settled flake.
    pub fn new(increment: f64) -> Self {
        debug_assert!(increment.is_finite() && increment > 0.0);
        Self {
            layers: BTreeMap::new(),
            increment,
        }
    }

    #[inline]
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Number of flakes stacked in `bin`.
    #[inline]
    pub fn layers(&self, bin: i64) -> u32 {
        self.layers.get(&bin).copied().unwrap_or(0)
    }

    /// Height of `bin`, or `0.0` when nothing has settled there.
    #[inline]
    pub fn height(&self, bin: i64) -> f64 {
        self.layers(bin) as f64 * self.increment
    }

    /// Add one flake landing at `x` and return the bin that grew.
    pub fn settle(&mut self, x: f64) -> i64 {
        debug_assert!(in_range(x), "settling at out-of-range x");
        let center = bin_for(x);
        let (Some(left), Some(right)) = (center.checked_sub(1), center.checked_add(1)) else {
            unreachable!("bin_for clamps to ±MAX_COORD");
        };

        let h_center = self.layers(center);
        let h_left = self.layers(left);
        let h_right = self.layers(right);
        let min = h_left.min(h_center).min(h_right);

        let target = if h_left == min {
            left
        } else if h_right == min {
            right
        } else {
            center
        };

        let entry = self.layers.entry(target).or_insert(0);
        *entry += 1;
        debug_assert!(*entry > 0);
        target
    }

    /// Remove all settled snow.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of non-empty bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Total number of flakes represented by the pile.
    pub fn total_layers(&self) -> u64 {
        self.layers.values().map(|&l| l as u64).sum()
    }

    /// Tallest column height.
    pub fn max_height(&self) -> f64 {
        self.layers.values().copied().max().unwrap_or(0) as f64 * self.increment
    }

    /// `(bin, height)` pairs in ascending bin order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        let increment = self.increment;
        self.layers.iter().map(move |(&bin, &layers)| (bin, layers as f64 * increment))
    }
}
