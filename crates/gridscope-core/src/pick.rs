//! Results of ray picking against grid geometry.

use glam::DVec3;

/// One ray/surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance from the ray origin, in plot-cube units.
    pub distance: f32,
    /// Intersection point in axis units.
    pub position: DVec3,
}

/// The bar closest to the eye along a pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarHit {
    /// Distance from the ray origin, in plot-cube units.
    pub distance: f32,
    /// Logical grid cell `(i, j)`.
    pub cell: (usize, usize),
    /// Position of the cell in the data table `(row, column)`.
    pub model_index: (usize, usize),
}
