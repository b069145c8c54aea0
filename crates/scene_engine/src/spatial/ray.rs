//! Rays for ray casting and picking

use super::bounds::{Aabb, BoundingSphere};
use crate::foundation::math::Vec3;

/// A ray for ray casting and picking
///
/// Only [`Ray::new`] builds one, so the direction is unit length unless the
/// ray is degenerate and hit distances are in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a new ray; the direction is normalized when it has a length.
    ///
    /// A zero direction is kept as-is so queries can reject it.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(f32::EPSILON).unwrap_or(direction),
        }
    }

    /// The origin point of the ray in world space
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// The unit direction of the ray
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Whether the ray has no usable direction
    pub fn is_degenerate(&self) -> bool {
        !(self.direction.iter().all(|c| c.is_finite()) && self.origin.iter().all(|c| c.is_finite()))
            || self.direction.norm_squared() <= f32::EPSILON
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the first point of `aabb` along the ray.
    ///
    /// Returns `Some(0.0)` when the origin is inside the box and `None` when
    /// the box is null, missed, or entirely behind the origin.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        if aabb.is_null() {
            return None;
        }
        if aabb.contains_point(self.origin) {
            return Some(0.0);
        }

        let mut t_near = 0.0_f32;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let (min, max) = (aabb.min[axis], aabb.max[axis]);

            if direction == 0.0 {
                // Parallel to this slab: must already be inside it
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t1 = (min - origin) * inv;
            let mut t2 = (max - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_near = t_near.max(t1);
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }

        Some(t_near)
    }

    /// Distance to the first point of `sphere` along the ray
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<f32> {
        // Vector from ray origin to sphere center
        let oc = self.origin - sphere.center;
        let c = oc.dot(&oc) - sphere.radius * sphere.radius;
        if c <= 0.0 {
            return Some(0.0);
        }

        // Solve |origin + t*direction - center|^2 = radius^2
        let a = self.direction.dot(&self.direction);
        let b = 2.0 * oc.dot(&self.direction);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        (t >= 0.0).then_some(t)
    }
}
