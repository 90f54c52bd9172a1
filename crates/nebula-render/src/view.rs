//! Per-frame view data handed to full-screen passes.
//!
//! A [`CameraView`] is the read-only snapshot of one camera for one frame: the
//! inverse projection, the camera transform, and the viewport rectangle it draws
//! into. Passes never derive these themselves.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};

/// Pixel rectangle a camera renders into, in framebuffer coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// A viewport anchored at the framebuffer origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Framebuffer position of the viewport center.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Packed as `(x, y, width, height)` for GPU upload.
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.x, self.y, self.width, self.height)
    }
}

/// Camera matrices and viewport for a single frame.
///
/// `inverse_projection` and `world_from_view` must come from the same camera
/// that renders the frame. Nothing here checks that; a non-invertible
/// projection produces NaN directions downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    /// Clip space to view space.
    pub inverse_projection: Mat4,
    /// View space to world space (the camera transform).
    pub world_from_view: Mat4,
    pub viewport: Viewport,
}

impl CameraView {
    pub fn to_uniform(&self) -> ViewUniform {
        ViewUniform {
            inverse_projection: self.inverse_projection.to_cols_array_2d(),
            world_from_view: self.world_from_view.to_cols_array_2d(),
            viewport: self.viewport.to_vec4().to_array(),
        }
    }
}

/// GPU layout of [`CameraView`]. Matches `struct View` in the skybox shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ViewUniform {
    pub inverse_projection: [[f32; 4]; 4],
    pub world_from_view: [[f32; 4]; 4],
    pub viewport: [f32; 4],
}

/// Map a framebuffer position into `[0, 1]^2` relative to `viewport`.
#[inline]
pub fn coords_to_viewport_uv(position: Vec2, viewport: &Viewport) -> Vec2 {
    (position - Vec2::new(viewport.x, viewport.y)) / Vec2::new(viewport.width, viewport.height)
}
