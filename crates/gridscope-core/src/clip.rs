//! Per-axis clip box gating which geometry is visible and pickable.
//!
//! Values are stored in axis units. Each side carries a dirty flag that is
//! set on every mutation; the owner consumes it to know when its cached
//! plot-cube uniforms must be recomputed.

use glam::DVec3;

use crate::axis::Axis;
use crate::error::Result;
use crate::plot_cube::AxisRanges;

/// Which sides of a [`ClipBox`] changed since the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipDirty {
    pub min: bool,
    pub max: bool,
}

impl ClipDirty {
    pub fn any(self) -> bool {
        self.min || self.max
    }
}

/// Min/max clip values for X, Y and Z.
#[derive(Debug, Clone)]
pub struct ClipBox {
    min: DVec3,
    max: DVec3,
    dirty: ClipDirty,
}

impl Default for ClipBox {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipBox {
    /// Creates an unbounded clip box; both sides start dirty.
    pub fn new() -> Self {
        Self {
            min: DVec3::splat(f64::NEG_INFINITY),
            max: DVec3::splat(f64::INFINITY),
            dirty: ClipDirty {
                min: true,
                max: true,
            },
        }
    }

    pub fn clip_min(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    pub fn clip_max(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }

    pub fn set_clip_min(&mut self, axis: Axis, value: f64) {
        self.min[axis.index()] = value;
        self.dirty.min = true;
    }

    pub fn set_clip_max(&mut self, axis: Axis, value: f64) {
        self.max[axis.index()] = value;
        self.dirty.max = true;
    }

    /// Applies an update coming from an interactive client.
    ///
    /// Clients address axes by raw index; the update then takes the same path
    /// as [`set_clip_min`](Self::set_clip_min) / [`set_clip_max`](Self::set_clip_max).
    pub fn apply_client_update(&mut self, raw_axis: u32, is_max: bool, value: f64) -> Result<()> {
        let axis = Axis::from_index(raw_axis)?;
        if is_max {
            self.set_clip_max(axis, value);
        } else {
            self.set_clip_min(axis, value);
        }
        Ok(())
    }

    /// Returns whether a point in axis units lies inside the box (inclusive).
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn is_dirty(&self) -> ClipDirty {
        self.dirty
    }

    /// Returns and clears the dirty flags.
    pub fn take_dirty(&mut self) -> ClipDirty {
        std::mem::take(&mut self.dirty)
    }

    /// Converts the box into plot-cube uniforms.
    pub fn uniforms(&self, ranges: &AxisRanges) -> ClipUniforms {
        let min = ranges.normalize_point(self.min);
        let max = ranges.normalize_point(self.max);
        ClipUniforms {
            min: min.to_array(),
            max: max.to_array(),
        }
    }
}

/// Clip box corners in plot-cube coordinates, as pushed to `uMinPt`/`uMaxPt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipUniforms {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let clip = ClipBox::new();
        for axis in Axis::ALL {
            assert_eq!(clip.clip_min(axis), f64::NEG_INFINITY);
            assert_eq!(clip.clip_max(axis), f64::INFINITY);
        }
        assert!(clip.contains(DVec3::new(1e30, -1e30, 0.0)));
    }

    #[test]
    fn test_dirty_flags_consumed_once() {
        let mut clip = ClipBox::new();
        assert!(clip.take_dirty().any());
        assert!(!clip.take_dirty().any());

        clip.set_clip_max(Axis::Y, 2.0);
        let dirty = clip.take_dirty();
        assert!(dirty.max);
        assert!(!dirty.min);
        assert!(!clip.is_dirty().any());
    }

    #[test]
    fn test_client_update_shares_path() {
        let mut clip = ClipBox::new();
        clip.take_dirty();
        clip.apply_client_update(2, false, -1.0).unwrap();
        assert_eq!(clip.clip_min(Axis::Z), -1.0);
        assert!(clip.is_dirty().min);
        assert!(clip.apply_client_update(7, true, 0.0).is_err());
    }

    #[test]
    fn test_contains() {
        let mut clip = ClipBox::new();
        clip.set_clip_min(Axis::X, 0.0);
        clip.set_clip_max(Axis::X, 1.0);
        assert!(clip.contains(DVec3::new(0.5, 100.0, -100.0)));
        assert!(!clip.contains(DVec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_uniforms_are_normalized() {
        let mut clip = ClipBox::new();
        clip.set_clip_min(Axis::X, 5.0);
        let ranges = AxisRanges::new((0.0, 10.0), (0.0, 1.0), (0.0, 1.0));
        let uniforms = clip.uniforms(&ranges);
        assert_eq!(uniforms.min[0], 0.5);
        assert_eq!(uniforms.max[1], f32::INFINITY);

        // Same box, wider range
        let wider = AxisRanges::new((0.0, 20.0), (0.0, 1.0), (0.0, 1.0));
        assert_eq!(clip.uniforms(&wider).min[0], 0.25);
    }
}
