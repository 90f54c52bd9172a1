//! Sine-based hash noise.
//!
//! Cheap, branch-free and stateless, so every pixel can hash its own direction
//! independently. The constants are part of the look of the sky and match the
//! WGSL copies in [`crate::shader`] exactly.

use glam::{Vec2, Vec3};

const HASH_SCALE: f32 = 43758.5453;

/// `x - floor(x)`, kept strictly below 1.0.
///
/// Tiny negative inputs round up to exactly 1.0 in f32; those fold to 0.0.
#[inline]
pub fn fract(x: f32) -> f32 {
    let f = x - x.floor();
    if f >= 1.0 { 0.0 } else { f }
}

/// 2D point to a pseudo-random 2D vector in `[0, 1)^2`.
#[inline]
pub fn hash2d(p: Vec2) -> Vec2 {
    let q = Vec2::new(p.dot(Vec2::new(127.1, 311.7)), p.dot(Vec2::new(269.5, 183.3)));
    Vec2::new(
        fract(q.x.sin() * HASH_SCALE),
        fract(q.y.sin() * HASH_SCALE),
    )
}

/// 3D point to a pseudo-random scalar in `[0, 1)`.
#[inline]
pub fn hash3d(p: Vec3) -> f32 {
    fract(p.dot(Vec3::new(127.1, 311.7, 74.7)).sin() * HASH_SCALE)
}

/// 2D point to a pseudo-random scalar in `[0, 1)`. Drives per-pixel star size.
#[inline]
pub fn random2d(p: Vec2) -> f32 {
    fract(p.dot(Vec2::new(12.9898, 78.233)).sin() * HASH_SCALE)
}
