//! Camera system for view and projection matrix generation.

use crate::view::{CameraView, Viewport};
use glam::{Mat4, Quat, Vec3};

/// EV100 used when a camera carries no explicit [`Exposure`].
pub const DEFAULT_EV100: f32 = 9.7;

/// A camera that generates view and projection matrices for rendering.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Projection parameters.
    pub projection: Projection,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance. Ignored by [`Projection::InfinitePerspective`].
    pub far: f32,
}

/// Projection type for the camera.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Finite reverse-Z perspective.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
    /// Reverse-Z perspective with the far plane at infinity.
    InfinitePerspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
}

/// Photographic exposure of a camera, expressed as EV100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exposure {
    pub ev100: f32,
}

impl Exposure {
    /// Linear scale applied to scene luminance.
    pub fn exposure(&self) -> f32 {
        (-self.ev100).exp2() / 1.2
    }
}

impl Default for Exposure {
    fn default() -> Self {
        Self {
            ev100: DEFAULT_EV100,
        }
    }
}

impl Camera {
    /// Camera transform: view space to world space.
    ///
    /// Built directly from rotation and translation so the linear part is the
    /// exact rotation matrix no matter how far the camera is from the origin.
    pub fn world_from_view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Compute the projection matrix with reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        match &self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => {
                // Reverse-Z: near plane maps to z=1, far plane maps to z=0.
                Mat4::perspective_rh(
                    *fov_y,
                    *aspect_ratio,
                    self.far,  // swapped: far as "near" parameter
                    self.near, // swapped: near as "far" parameter
                )
            }
            Projection::InfinitePerspective {
                fov_y,
                aspect_ratio,
            } => Mat4::perspective_infinite_reverse_rh(*fov_y, *aspect_ratio, self.near),
        }
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Snapshot this camera for one frame rendered into `viewport`.
    pub fn camera_view(&self, viewport: Viewport) -> CameraView {
        CameraView {
            inverse_projection: self.projection_matrix().inverse(),
            world_from_view: self.world_from_view(),
            viewport,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::InfinitePerspective {
                fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
                aspect_ratio: 16.0 / 9.0,
            },
            near: 0.1,
            far: 10000.0,
        }
    }
}
