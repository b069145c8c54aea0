//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph and the
//! query engine. Coordinates are right-handed and Y-up; objects look down
//! their local -Z axis.

pub use nalgebra::{
    Vector3,
    Matrix3,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local forward axis of every node (right-handed, -Z forward)
pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// World up axis
pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * self.scale.component_mul(&point)
    }

    /// Upper 3x3 block (rotation * scale) of the matrix form
    pub fn linear_part(&self) -> Mat3 {
        self.rotation.to_rotation_matrix().into_inner() * Mat3::from_diagonal(&self.scale)
    }

    /// Combine this (parent) transform with a child's local transform.
    ///
    /// Orientation and scale multiply; the child position is scaled and
    /// rotated by the parent before the parent position is added.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }
}

/// Orientation whose local -Z axis points along `direction`.
///
/// Keeps `up` as the reference up vector. When `direction` is parallel to
/// `up` the shortest-arc rotation from [`FORWARD`] is used instead. Returns
/// `None` for a zero-length direction.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize(f32::EPSILON)?;

    let right = forward.cross(&up);
    if right.norm_squared() < 1e-8 {
        return Quat::rotation_between(&FORWARD, &forward)
            .or_else(|| Some(Quat::from_axis_angle(&Vec3::y_axis(), constants::PI)));
    }
    let right = right.normalize();
    let new_up = right.cross(&forward).normalize();

    let basis = Mat3::from_columns(&[right, new_up, -forward]);
    Some(Quat::from_matrix(&basis))
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_combine_matches_nested_points() {
        let parent = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), constants::HALF_PI),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let child = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));

        let point = Vec3::new(0.5, -2.0, 4.0);
        let combined = parent.combine(&child).transform_point(point);
        let nested = parent.transform_point(child.transform_point(point));
        assert_relative_eq!(combined, nested, epsilon = EPSILON);
        assert_relative_eq!(parent.combine(&child).position, Vec3::new(1.0, 2.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_look_rotation_points_forward_axis() {
        let direction = Vec3::new(1.0, -1.0, 0.5);
        let rotation = look_rotation(direction, UP).unwrap();
        assert_relative_eq!(rotation * FORWARD, direction.normalize(), epsilon = EPSILON);
    }

    #[test]
    fn test_look_rotation_parallel_to_up() {
        let rotation = look_rotation(Vec3::new(0.0, 5.0, 0.0), UP).unwrap();
        assert_relative_eq!(rotation * FORWARD, UP, epsilon = EPSILON);
    }

    #[test]
    fn test_look_rotation_zero_direction() {
        assert!(look_rotation(Vec3::zeros(), UP).is_none());
    }
}
