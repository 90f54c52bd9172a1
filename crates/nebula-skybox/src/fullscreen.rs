//! Full-screen triangle generated from the vertex index alone.
//!
//! Three vertices at (-1,-1), (3,-1) and (-1,3) in clip space. Clipping crops
//! the triangle to the visible square, so no vertex or index buffer is needed and
//! there is no diagonal seam as with a two-triangle quad.

use glam::Vec4;

/// Vertices drawn per full-screen pass.
pub const FULLSCREEN_TRIANGLE_VERTEX_COUNT: u32 = 3;

/// Clip-space position of vertex `index`.
///
/// Only bits 0 and 1 of `index` are read. z lands on 0.0, the far plane under
/// reverse-Z, and w on 1.0.
#[inline]
pub fn fullscreen_triangle_vertex(index: u32) -> Vec4 {
    let seed = Vec4::new((index & 1) as f32, ((index >> 1) & 1) as f32, 0.25, 0.5);
    seed * 4.0 - Vec4::ONE
}
