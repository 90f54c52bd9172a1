//! Star field evaluation: ray direction to final pixel color.
//!
//! CPU mirror of `skybox_fragment` in [`crate::shader`]. The software renderer and
//! the cubemap baker call straight into [`skybox_fragment`] and
//! [`evaluate_star_color`].

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec3Swizzles, Vec4};
use nebula_render::{CameraView, Exposure};
use serde::{Deserialize, Serialize};

use crate::density::StarDensity;
use crate::hash::random2d;
use crate::ray::reconstruct_ray_direction;

/// Smallest per-pixel star size.
pub const MIN_STAR_SIZE: f32 = 0.01;
/// Star size spread added on top of [`MIN_STAR_SIZE`].
pub const STAR_SIZE_RANGE: f32 = 0.03;

/// Skybox settings attached to a camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceSkybox {
    /// Scale factor applied to the sky before camera exposure.
    pub brightness: f32,
    /// Multiply the final color by the exposed brightness. When off the sky is
    /// written at unit brightness regardless of `brightness`.
    pub apply_brightness: bool,
    pub density: StarDensity,
    /// Linear RGB of a star.
    pub star_color: [f32; 3],
    /// Linear RGB of empty space.
    pub space_color: [f32; 3],
}

impl Default for SpaceSkybox {
    fn default() -> Self {
        Self {
            brightness: 1000.0,
            apply_brightness: true,
            density: StarDensity::default(),
            star_color: [1.0, 1.0, 1.0],
            space_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Per-frame skybox parameters, extracted from a [`SpaceSkybox`] and the
/// camera's exposure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceSkyboxUniforms {
    pub brightness: f32,
    pub density: StarDensity,
    pub star_color: Vec3,
    pub space_color: Vec3,
}

impl SpaceSkyboxUniforms {
    /// Combine skybox settings with camera exposure. Cameras without an
    /// [`Exposure`] use the default EV100.
    pub fn extract(skybox: &SpaceSkybox, exposure: Option<&Exposure>) -> Self {
        let exposure = exposure.copied().unwrap_or_default().exposure();
        let brightness = if skybox.apply_brightness {
            skybox.brightness * exposure
        } else {
            1.0
        };
        Self {
            brightness,
            density: skybox.density,
            star_color: Vec3::from_array(skybox.star_color),
            space_color: Vec3::from_array(skybox.space_color),
        }
    }

    pub fn to_gpu(&self) -> SkyboxUniformsGpu {
        let (strategy, scale, threshold, softness, plane) = match self.density {
            StarDensity::Voronoi { scale, plane } => (0, scale, 0.0, 0.0, plane.shader_index()),
            StarDensity::HardThreshold { scale, threshold } => (1, scale, threshold, 0.0, 0),
            StarDensity::SmoothCell {
                scale,
                threshold,
                softness,
            } => (2, scale, threshold, softness, 0),
        };
        SkyboxUniformsGpu {
            star_color: self.star_color.to_array(),
            brightness: self.brightness,
            space_color: self.space_color.to_array(),
            scale,
            threshold,
            softness,
            strategy,
            plane,
        }
    }
}

impl Default for SpaceSkyboxUniforms {
    fn default() -> Self {
        Self::extract(&SpaceSkybox::default(), None)
    }
}

/// GPU layout of [`SpaceSkyboxUniforms`]. Matches `struct SpaceSkyboxUniforms`
/// in the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SkyboxUniformsGpu {
    pub star_color: [f32; 3],
    pub brightness: f32,
    pub space_color: [f32; 3],
    pub scale: f32,
    pub threshold: f32,
    pub softness: f32,
    /// 0 = Voronoi, 1 = hard threshold, 2 = smooth cell.
    pub strategy: u32,
    /// Voronoi projection plane, see [`crate::ProjectionPlane::shader_index`].
    pub plane: u32,
}

/// Per-pixel star size threshold for a random value in `[0, 1]`.
#[inline]
pub fn star_size_threshold(rand: f32) -> f32 {
    MIN_STAR_SIZE + rand * STAR_SIZE_RANGE
}

/// Color of the sky seen along a unit `direction`.
#[inline]
pub fn evaluate_star_color(direction: Vec3, uniforms: &SpaceSkyboxUniforms) -> Vec4 {
    let star_size = star_size_threshold(random2d(direction.xz()));
    let intensity = uniforms.density.intensity(direction, star_size);
    let color = uniforms.space_color.lerp(uniforms.star_color, intensity);
    (color * uniforms.brightness).extend(1.0)
}

/// Fragment stage: framebuffer `position` to color.
#[inline]
pub fn skybox_fragment(position: Vec2, view: &CameraView, uniforms: &SpaceSkyboxUniforms) -> Vec4 {
    evaluate_star_color(reconstruct_ray_direction(position, view), uniforms)
}
