//! # Perspective Camera
//!
//! Projection parameters for a camera movable object. The camera's pose is
//! not stored here: like every movable object it takes position and
//! orientation from the scene node it is attached to, and looks down that
//! node's local -Z axis.
//!
//! ## Coordinate System
//! Right-handed, Y-up view space:
//! - X+ = Right
//! - Y+ = Up
//! - Z- = Forward (into the screen)

use crate::foundation::math::{utils, Transform, Vec3};
use crate::spatial::Ray;

/// Perspective projection parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view angle in radians
    pub fov_y: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera
    ///
    /// # Arguments
    /// * `fov_degrees` - Vertical field of view angle in degrees (converted to radians internally)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use scene_engine::scene::Camera;
    ///
    /// let camera = Camera::perspective(
    ///     45.0,        // 45-degree vertical field of view
    ///     4.0 / 3.0,   // Viewport aspect ratio
    ///     100.0,       // Near plane
    ///     100_000.0,   // Far plane
    /// );
    /// assert!(camera.fov_y > 0.78 && camera.fov_y < 0.79);
    /// ```
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// View-space vector from the eye through a viewport point, scaled so
    /// that its z component is -1.
    ///
    /// `x` and `y` are normalized viewport coordinates in `[0, 1]`, with
    /// `(0, 0)` the top-left corner.
    pub fn view_space_direction(&self, x: f32, y: f32) -> Vec3 {
        let tan_half_fov = (self.fov_y * 0.5).tan();
        let ndc_x = x * 2.0 - 1.0;
        let ndc_y = 1.0 - y * 2.0;
        Vec3::new(tan_half_fov * self.aspect * ndc_x, tan_half_fov * ndc_y, -1.0)
    }

    /// World-space ray through a viewport point for a camera with pose `eye`.
    ///
    /// The ray starts on the near plane, so distances along it are measured
    /// from there rather than from the eye.
    pub fn viewport_ray(&self, eye: &Transform, x: f32, y: f32) -> Ray {
        let view_direction = self.view_space_direction(x, y);
        let origin = eye.position + eye.rotation * (view_direction * self.near);
        Ray::new(origin, eye.rotation * view_direction)
    }
}

impl Default for Camera {
    /// 45 degree vertical field of view, 16:9 aspect, near 0.1, far 1000
    fn default() -> Self {
        Self::perspective(45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
