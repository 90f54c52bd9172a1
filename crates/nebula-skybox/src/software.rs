//! CPU rasterization of the skybox pass.
//!
//! The full-screen triangle covers every pixel of the viewport, so rasterizing it
//! reduces to running the fragment stage at each pixel center. Rows are shaded in
//! parallel; pixels never read each other.

use glam::{Vec2, Vec4};
use image::RgbaImage;
use nebula_render::CameraView;
use rayon::prelude::*;

use crate::error::SkyboxError;
use crate::evaluator::{SpaceSkyboxUniforms, skybox_fragment};

/// Largest frame width or height [`render_frame`] accepts.
pub const MAX_FRAME_DIMENSION: u32 = 16384;

/// Quantize a linear color to RGBA8, clamping HDR values.
#[inline]
pub fn color_to_rgba8(color: Vec4) -> [u8; 4] {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
}

/// Render one frame of the skybox for `view` into an image the size of its viewport.
pub fn render_frame(
    view: &CameraView,
    uniforms: &SpaceSkyboxUniforms,
) -> Result<RgbaImage, SkyboxError> {
    let width = view.viewport.width.round() as u32;
    let height = view.viewport.height.round() as u32;
    if width == 0 || height == 0 {
        return Err(SkyboxError::EmptyViewport { width, height });
    }
    if width > MAX_FRAME_DIMENSION || height > MAX_FRAME_DIMENSION {
        return Err(SkyboxError::FrameTooLarge { width, height });
    }

    let origin = Vec2::new(view.viewport.x, view.viewport.y);
    let mut image = RgbaImage::new(width, height);
    image
        .par_chunks_mut(width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                let position = origin + Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let color = skybox_fragment(position, view, uniforms);
                pixel.copy_from_slice(&color_to_rgba8(color));
            }
        });

    log::debug!(
        "Rendered {}x{} skybox frame with {} stars",
        width,
        height,
        uniforms.density.name()
    );
    Ok(image)
}
