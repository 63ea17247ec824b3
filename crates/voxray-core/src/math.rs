//! Math utilities and helpers.

use glam::Vec3;

/// Ray for picking and collision queries.
///
/// The direction is stored exactly as given. Collision code never requires it
/// to be normalized, so camera view vectors can be passed through unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (not necessarily normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    #[inline]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parameter t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Returns true if every direction component is zero.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create the AABB of a cube with the given center and edge length
    #[inline]
    pub fn from_center_size(center: Vec3, size: f32) -> Self {
        let half = Vec3::splat(size * 0.5);
        Self::new(center - half, center + half)
    }

    /// Corners as `[min, max]`, the layout the slab test indexes by sign.
    #[inline]
    pub const fn bounds(&self) -> [Vec3; 2] {
        [self.min, self.max]
    }
}
