//! Rays and ray/triangle intersection.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Determinants below this are treated as a ray parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Slack on the barycentric bounds, so rays through shared edges and
/// vertices are not lost to rounding.
const BARYCENTRIC_EPSILON: f32 = 1e-6;

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Where a ray crosses a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray.
    pub t: f32,
    /// Barycentric weight of the second vertex.
    pub beta: f32,
    /// Barycentric weight of the third vertex.
    pub gamma: f32,
}

impl Ray {
    /// Creates a ray, normalizing the direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Builds the ray under a screen pixel.
    ///
    /// `inverse_transform` is the inverse of `projection * view * model`, so
    /// the ray is expressed in the model space of that transform. Pixel
    /// coordinates start at the top-left corner. Returns `None` for an empty
    /// viewport or a singular transform.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_screen(pixel: Vec2, viewport: (u32, u32), inverse_transform: Mat4) -> Option<Self> {
        let (width, height) = viewport;
        if width == 0 || height == 0 {
            return None;
        }

        let half_width = width as f32 / 2.0;
        let half_height = height as f32 / 2.0;
        let ndc_x = (pixel.x / half_width) - 1.0;
        let ndc_y = 1.0 - (pixel.y / half_height);

        // NDC depth runs over [0, 1]
        let near = inverse_transform * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inverse_transform * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
            return None;
        }

        let origin = near.truncate() / near.w;
        let direction = (far.truncate() / far.w - origin).normalize_or_zero();
        if direction.length_squared() < 1e-12 {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// Returns the point at distance `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Determinant-based barycentric intersection test.
    ///
    /// Hits behind the origin and degenerate (zero-area) triangles yield `None`.
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }
        let f = 1.0 / a;
        let s = self.origin - v0;
        let beta = f * s.dot(h);
        if !(-BARYCENTRIC_EPSILON..=1.0 + BARYCENTRIC_EPSILON).contains(&beta) {
            return None;
        }
        let q = s.cross(edge1);
        let gamma = f * self.direction.dot(q);
        if gamma < -BARYCENTRIC_EPSILON || beta + gamma > 1.0 + BARYCENTRIC_EPSILON {
            return None;
        }
        let t = f * edge2.dot(q);
        if t < 0.0 {
            return None;
        }
        Some(TriangleHit { t, beta, gamma })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_center() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::NEG_Z);
        let hit = ray
            .intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y)
            .unwrap();
        assert!((hit.t - 5.0).abs() < 1e-6);
        assert!((hit.beta - 0.25).abs() < 1e-6);
        assert!((hit.gamma - 0.25).abs() < 1e-6);
        assert!((ray.at(hit.t) - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_miss_outside() {
        let ray = Ray::new(Vec3::new(0.8, 0.8, 5.0), Vec3::NEG_Z);
        assert!(ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_behind_origin() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -5.0), Vec3::NEG_Z);
        assert!(ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_degenerate_triangle() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::X).is_none());
    }

    #[test]
    fn test_shared_vertex_hit() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 1.0), Vec3::NEG_Z);
        assert!(ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y).is_some());
    }

    #[test]
    fn test_from_screen_identity() {
        let ray = Ray::from_screen(Vec2::new(50.0, 50.0), (100, 100), Mat4::IDENTITY).unwrap();
        assert!(ray.origin.truncate().length() < 1e-6);
        assert!((ray.direction - Vec3::Z).length() < 1e-6);
        assert!(Ray::from_screen(Vec2::ZERO, (0, 10), Mat4::IDENTITY).is_none());
    }
}
