//! Mapping between axis units and the normalized `[0, 1]` plot cube.

use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;

/// Smallest extent used when normalizing, so flat ranges do not divide by zero.
pub const MIN_EXTENT: f64 = 1e-6;

/// The displayed range of each chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    ranges: [(f64, f64); 3],
}

impl Default for AxisRanges {
    fn default() -> Self {
        Self {
            ranges: [(0.0, 1.0); 3],
        }
    }
}

impl AxisRanges {
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self { ranges: [x, y, z] }
    }

    pub fn range(&self, axis: Axis) -> (f64, f64) {
        self.ranges[axis.index()]
    }

    pub fn set_range(&mut self, axis: Axis, min: f64, max: f64) {
        self.ranges[axis.index()] = (min, max);
    }

    /// Returns `max - min`, replaced by [`MIN_EXTENT`] when it is (near) zero.
    pub fn extent(&self, axis: Axis) -> f64 {
        let (min, max) = self.range(axis);
        let extent = max - min;
        if extent.abs() < MIN_EXTENT {
            MIN_EXTENT
        } else {
            extent
        }
    }

    /// Maps a value in axis units into `[0, 1]`.
    pub fn normalize(&self, axis: Axis, value: f64) -> f64 {
        (value - self.range(axis).0) / self.extent(axis)
    }

    /// Maps a plot-cube coordinate back to axis units.
    pub fn denormalize(&self, axis: Axis, value: f64) -> f64 {
        self.range(axis).0 + value * self.extent(axis)
    }

    /// Normalizes a point, narrowing to the `f32` used by vertex buffers.
    #[allow(clippy::cast_possible_truncation)]
    pub fn normalize_point(&self, point: DVec3) -> Vec3 {
        Vec3::new(
            self.normalize(Axis::X, point.x) as f32,
            self.normalize(Axis::Y, point.y) as f32,
            self.normalize(Axis::Z, point.z) as f32,
        )
    }

    pub fn denormalize_point(&self, point: Vec3) -> DVec3 {
        DVec3::new(
            self.denormalize(Axis::X, f64::from(point.x)),
            self.denormalize(Axis::Y, f64::from(point.y)),
            self.denormalize(Axis::Z, f64::from(point.z)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize() {
        let ranges = AxisRanges::new((0.0, 10.0), (-1.0, 1.0), (2.0, 4.0));
        assert_eq!(ranges.normalize(Axis::X, 5.0), 0.5);
        assert_eq!(ranges.normalize(Axis::Y, -1.0), 0.0);
        assert_eq!(ranges.denormalize(Axis::Z, 1.0), 4.0);
    }

    #[test]
    fn test_flat_range_uses_epsilon() {
        let ranges = AxisRanges::new((0.0, 1.0), (0.0, 1.0), (3.0, 3.0));
        let n = ranges.normalize(Axis::Z, 3.0);
        assert!(n.is_finite());
        assert_eq!(n, 0.0);
        assert_eq!(ranges.extent(Axis::Z), MIN_EXTENT);
    }

    #[test]
    fn test_point_round_trip() {
        let ranges = AxisRanges::new((-3.0, 3.0), (0.0, 6.0), (0.0, 2.0));
        let p = DVec3::new(1.5, 2.0, 0.5);
        let back = ranges.denormalize_point(ranges.normalize_point(p));
        assert!((back - p).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_normalize_round_trip(
            min in -1e3..1e3_f64,
            span in 1e-3..1e3_f64,
            t in 0.0..1.0_f64,
        ) {
            let ranges = AxisRanges::new((min, min + span), (0.0, 1.0), (0.0, 1.0));
            let value = min + t * span;
            let normalized = ranges.normalize(Axis::X, value);
            prop_assert!((-1e-9..=1.0 + 1e-9).contains(&normalized));
            prop_assert!((ranges.denormalize(Axis::X, normalized) - value).abs() < 1e-6 * span.max(1.0));
        }
    }
}
