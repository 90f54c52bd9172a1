//! Procedural sky baked into a cubemap.
//!
//! Feeds the cubemap binding of the skybox pass and lets the sky be exported as
//! six face images for texture-based skies.

use glam::Vec3;
use image::RgbaImage;
use rayon::prelude::*;

use crate::error::SkyboxError;
use crate::evaluator::{SpaceSkyboxUniforms, evaluate_star_color};
use crate::software::color_to_rgba8;

/// Largest face size [`SkyCubemap::bake`] accepts.
pub const MAX_FACE_SIZE: u32 = 8192;

/// Face names in face-index order.
pub const FACE_NAMES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

/// Six square faces of linear RGBA sky color.
pub struct SkyCubemap {
    /// Width/height of each cubemap face in pixels.
    pub face_size: u32,
    /// Six faces, each `face_size * face_size` pixels, stored as RGBA f32.
    pub faces: [Vec<[f32; 4]>; 6],
}

impl SkyCubemap {
    /// Evaluate the sky at the center of every texel.
    pub fn bake(uniforms: &SpaceSkyboxUniforms, face_size: u32) -> Result<Self, SkyboxError> {
        if face_size == 0 || face_size > MAX_FACE_SIZE {
            return Err(SkyboxError::InvalidFaceSize(face_size));
        }

        let size = face_size as usize;
        let faces = std::array::from_fn(|face_index| {
            let mut face = vec![[0.0, 0.0, 0.0, 1.0]; size * size];
            face.par_chunks_mut(size)
                .enumerate()
                .for_each(|(py, row)| {
                    let v = (py as f32 + 0.5) / face_size as f32;
                    for (px, texel) in row.iter_mut().enumerate() {
                        let u = (px as f32 + 0.5) / face_size as f32;
                        let dir = face_uv_to_direction(face_index, u, v);
                        *texel = evaluate_star_color(dir, uniforms).to_array();
                    }
                });
            face
        });

        let cubemap = Self { face_size, faces };
        log::debug!(
            "Baked {}x{} sky cubemap, {} lit texels",
            face_size,
            face_size,
            cubemap.lit_texels()
        );
        Ok(cubemap)
    }

    /// Nearest-texel lookup along `dir`.
    pub fn sample_nearest(&self, dir: Vec3) -> [f32; 4] {
        let (face_index, u, v) = direction_to_cube_face_uv(dir);
        let max = self.face_size as f32 - 1.0;
        let px = (u * self.face_size as f32).min(max) as u32;
        let py = (v * self.face_size as f32).min(max) as u32;
        self.faces[face_index][(py * self.face_size + px) as usize]
    }

    /// Texels with any non-zero color channel.
    pub fn lit_texels(&self) -> usize {
        self.faces
            .iter()
            .map(|face| {
                face.iter()
                    .filter(|px| px[0] > 0.0 || px[1] > 0.0 || px[2] > 0.0)
                    .count()
            })
            .sum()
    }

    /// Convert face data to RGBA8 bytes suitable for GPU upload.
    ///
    /// Returns a `Vec` of 6 face byte arrays, each `face_size * face_size * 4` bytes.
    pub fn to_rgba8(&self) -> Vec<Vec<u8>> {
        self.faces
            .iter()
            .map(|face| {
                face.iter()
                    .flat_map(|pixel| color_to_rgba8((*pixel).into()))
                    .collect()
            })
            .collect()
    }

    /// One face as an image, for export.
    pub fn face_image(&self, face_index: usize) -> RgbaImage {
        let bytes = self.faces[face_index]
            .iter()
            .flat_map(|pixel| color_to_rgba8((*pixel).into()))
            .collect();
        // Length is face_size^2 * 4 by construction.
        RgbaImage::from_raw(self.face_size, self.face_size, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.face_size, self.face_size))
    }
}

/// Map a unit direction vector to a cube face index (0..6) and UV coordinates in [0, 1].
///
/// Face indices: 0=+X, 1=-X, 2=+Y, 3=-Y, 4=+Z, 5=-Z.
pub fn direction_to_cube_face_uv(dir: Vec3) -> (usize, f32, f32) {
    let abs = dir.abs();
    let (face, u, v) = if abs.x >= abs.y && abs.x >= abs.z {
        if dir.x > 0.0 {
            (0, -dir.z / abs.x, -dir.y / abs.x)
        } else {
            (1, dir.z / abs.x, -dir.y / abs.x)
        }
    } else if abs.y >= abs.x && abs.y >= abs.z {
        if dir.y > 0.0 {
            (2, dir.x / abs.y, dir.z / abs.y)
        } else {
            (3, dir.x / abs.y, -dir.z / abs.y)
        }
    } else if dir.z > 0.0 {
        (4, dir.x / abs.z, -dir.y / abs.z)
    } else {
        (5, -dir.x / abs.z, -dir.y / abs.z)
    };
    (face, u * 0.5 + 0.5, v * 0.5 + 0.5)
}

/// Unit direction through `(u, v)` on `face`. Inverse of [`direction_to_cube_face_uv`].
pub fn face_uv_to_direction(face: usize, u: f32, v: f32) -> Vec3 {
    let a = u * 2.0 - 1.0;
    let b = v * 2.0 - 1.0;
    let dir = match face {
        0 => Vec3::new(1.0, -b, -a),
        1 => Vec3::new(-1.0, -b, a),
        2 => Vec3::new(a, 1.0, b),
        3 => Vec3::new(a, -1.0, -b),
        4 => Vec3::new(a, -b, 1.0),
        _ => Vec3::new(-a, -b, -1.0),
    };
    dir.normalize()
}
