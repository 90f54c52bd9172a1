//! Cellular (Worley) distance field.

use glam::Vec2;

use crate::hash::hash2d;

/// Euclidean distance from `p` to the nearest jittered lattice point.
///
/// Each integer cell holds one point at `cell + hash2d(cell)`. Only the 3x3 block
/// of cells around `p` is searched.
pub fn voronoi(p: Vec2) -> f32 {
    let cell = p.floor();
    let local = p - cell;

    let mut min_dist_sq = f32::MAX;
    for y in -1..=1 {
        for x in -1..=1 {
            let offset = Vec2::new(x as f32, y as f32);
            let point = offset + hash2d(cell + offset) - local;
            min_dist_sq = min_dist_sq.min(point.length_squared());
        }
    }
    min_dist_sq.sqrt()
}
