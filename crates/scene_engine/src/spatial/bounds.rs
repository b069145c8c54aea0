//! Bounding volumes used by the broad and narrow phase

use crate::foundation::math::{Transform, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
///
/// A box whose `min` exceeds its `max` on any axis is *null*: it contains
/// nothing and intersects nothing. Detached objects report a null box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// The empty box
    pub const NULL: Self = Self {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Cube of half size `half` around the origin
    pub fn cube(half: f32) -> Self {
        Self::from_center_extents(Vec3::zeros(), Vec3::new(half, half, half))
    }

    /// Whether the box is empty
    pub fn is_null(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point (boundary included)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB.
    ///
    /// Touching faces count as an intersection; null boxes never intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Smallest box enclosing both boxes
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_null() {
            return *other;
        }
        if other.is_null() {
            return *self;
        }
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Box enclosing this box after `transform`.
    ///
    /// Transforms the centre and grows the half extents by the absolute
    /// value of the linear part, so translations stay exact.
    pub fn transformed(&self, transform: &Transform) -> Self {
        if self.is_null() {
            return Self::NULL;
        }
        let center = transform.transform_point(self.center());
        let extents = transform.linear_part().abs() * self.extents();
        Self::from_center_extents(center, extents)
    }

    /// Sphere enclosing this box
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        if self.is_null() {
            return None;
        }
        Some(BoundingSphere::new(self.center(), self.extents().norm()))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::NULL
    }
}

/// A bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Check if this sphere touches a box
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        if aabb.is_null() {
            return false;
        }
        let closest_point = self.center.sup(&aabb.min).inf(&aabb.max);
        (closest_point - self.center).magnitude_squared() <= self.radius * self.radius
    }

    /// Sphere after `transform`; the radius grows with the largest scale axis
    pub fn transformed(&self, transform: &Transform) -> Self {
        let scale = transform.scale.abs().max();
        Self {
            center: transform.transform_point(self.center),
            radius: self.radius * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants, Quat};
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::cube(1.0);

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(1.0, 0.5, -1.0)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));
        let touching = Aabb::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 2.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
        assert!(aabb1.intersects(&touching));
    }

    #[test]
    fn test_null_box_never_intersects() {
        assert!(Aabb::NULL.is_null());
        assert!(!Aabb::NULL.intersects(&Aabb::cube(1.0e6)));
        assert!(!Aabb::cube(1.0).intersects(&Aabb::NULL));
        assert_eq!(Aabb::NULL.merge(&Aabb::cube(1.0)), Aabb::cube(1.0));
        assert!(Aabb::NULL.transformed(&Transform::identity()).is_null());
    }

    #[test]
    fn test_translation_is_exact() {
        let position = Vec3::new(-2499.8877, -2074.838, 506.76318);
        let world = Aabb::cube(100.0).transformed(&Transform::from_position(position));

        assert_eq!(world.min, position - Vec3::new(100.0, 100.0, 100.0));
        assert_eq!(world.max, position + Vec3::new(100.0, 100.0, 100.0));
    }

    #[test]
    fn test_rotation_grows_box() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), constants::PI / 4.0);
        let world = Aabb::cube(1.0).transformed(&Transform::from_position_rotation(Vec3::zeros(), rotation));

        let half = 2.0_f32.sqrt();
        assert_relative_eq!(world.max, Vec3::new(half, half, 1.0), epsilon = 1e-5);
        assert_relative_eq!(world.min, -Vec3::new(half, half, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_intersections() {
        let a = BoundingSphere::new(Vec3::zeros(), 5.0);
        let b = BoundingSphere::new(Vec3::new(8.0, 0.0, 0.0), 5.0);
        let c = BoundingSphere::new(Vec3::new(20.0, 0.0, 0.0), 5.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.intersects_aabb(&Aabb::new(Vec3::new(4.0, -1.0, -1.0), Vec3::new(6.0, 1.0, 1.0))));
        assert!(!a.intersects_aabb(&Aabb::new(Vec3::new(4.0, 4.0, 4.0), Vec3::new(6.0, 6.0, 6.0))));
    }
}
