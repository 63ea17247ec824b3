//! Ray intersection primitives.
//!
//! Directions do not need to be normalized. Zero direction components are
//! handled explicitly so no NaN ever reaches an interval comparison.

use glam::Vec3;

/// Returns true if the half-line from `origin` along `direction` meets the
/// sphere at a non-negative distance. An origin inside the sphere counts.
#[inline]
pub fn sphere_intersect(origin: Vec3, direction: Vec3, center: Vec3, radius_squared: f32) -> bool {
    let to_center = center - origin;
    if to_center.length_squared() <= radius_squared {
        return true;
    }

    let scale = direction.abs().max_element();
    if scale == 0.0 {
        return false;
    }
    // Rescaled so the squared length lies in [1, 3] for any finite direction.
    let direction = direction / scale;

    // Parameter of the point closest to the center.
    let t = to_center.dot(direction) / direction.length_squared();
    if t < 0.0 {
        return false;
    }

    (origin + direction * t).distance_squared(center) <= radius_squared
}

/// Slab test against the box `[min, max]`, treating the ray as a full line.
///
/// Returns true if the combined interval of all three axes is non-empty.
#[inline]
pub fn box_intersect(box_bounds: [Vec3; 2], origin: Vec3, direction: Vec3) -> bool {
    box_entry_distance(box_bounds, origin, direction).is_some()
}

/// Slab test returning the combined parametric interval `(t_min, t_max)`.
///
/// `t_min` is where the line enters the box and `t_max` where it leaves, in
/// units of `direction`. Either bound may be negative or infinite (a ray
/// parallel to a slab it starts inside of is unconstrained on that axis).
pub fn box_entry_distance(box_bounds: [Vec3; 2], origin: Vec3, direction: Vec3) -> Option<(f32, f32)> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let (near, far) = slab_interval(
            [box_bounds[0][axis], box_bounds[1][axis]],
            origin[axis],
            direction[axis],
        )?;

        if t_min > far || near > t_max {
            return None;
        }
        t_min = t_min.max(near);
        t_max = t_max.min(far);
    }

    Some((t_min, t_max))
}

/// Interval of one slab, or `None` if the ray runs parallel outside of it.
#[inline]
fn slab_interval(bounds: [f32; 2], origin: f32, direction: f32) -> Option<(f32, f32)> {
    let inverse = direction.recip();
    if !inverse.is_finite() {
        // No extent on this axis (zero or subnormal component).
        return (bounds[0]..=bounds[1])
            .contains(&origin)
            .then_some((f32::NEG_INFINITY, f32::INFINITY));
    }

    let sign = usize::from(inverse < 0.0);
    Some((
        (bounds[sign] - origin) * inverse,
        (bounds[1 - sign] - origin) * inverse,
    ))
}
