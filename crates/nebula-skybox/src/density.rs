//! Star density functions: how a ray direction becomes "star" or "space".
//!
//! Each strategy returns a star intensity in `[0, 1]`; the evaluator blends the
//! space color toward the star color by it. [`StarDensity::Voronoi`] is the
//! default look; the other two are kept as swappable alternatives.

use glam::{Vec2, Vec3, Vec3Swizzles};
use serde::{Deserialize, Serialize};

use crate::hash::{fract, hash3d};
use crate::voronoi::voronoi;

/// Which pair of direction components feeds the 2D Voronoi field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionPlane {
    Xy,
    #[default]
    Xz,
    Yz,
}

impl ProjectionPlane {
    #[inline]
    pub fn project(self, direction: Vec3) -> Vec2 {
        match self {
            ProjectionPlane::Xy => direction.xy(),
            ProjectionPlane::Xz => direction.xz(),
            ProjectionPlane::Yz => direction.yz(),
        }
    }

    /// Index used by the shader uniform.
    pub fn shader_index(self) -> u32 {
        match self {
            ProjectionPlane::Xy => 0,
            ProjectionPlane::Xz => 1,
            ProjectionPlane::Yz => 2,
        }
    }
}

/// Interchangeable star density function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StarDensity {
    /// Distance to the nearest point of a cellular field over a 2D slice of the
    /// direction. Stars are round with per-pixel randomized radius.
    Voronoi {
        /// Cells per unit of the projected direction. Higher means more stars.
        scale: f32,
        plane: ProjectionPlane,
    },
    /// One hash per 3D grid cell, hard cut at `threshold`. Sparse pin-point stars.
    HardThreshold { scale: f32, threshold: f32 },
    /// One hash per 3D grid cell with a smooth presence ramp and a radial
    /// falloff inside the cell for softer edges.
    SmoothCell {
        scale: f32,
        threshold: f32,
        softness: f32,
    },
}

impl Default for StarDensity {
    fn default() -> Self {
        Self::voronoi()
    }
}

impl StarDensity {
    pub const VORONOI_SCALE: f32 = 100.0;
    pub const HARD_THRESHOLD_SCALE: f32 = 500.0;
    pub const HARD_THRESHOLD: f32 = 0.998;
    pub const SMOOTH_CELL_SCALE: f32 = 200.0;
    pub const SMOOTH_CELL_THRESHOLD: f32 = 0.995;
    pub const SMOOTH_CELL_SOFTNESS: f32 = 0.004;

    pub fn voronoi() -> Self {
        Self::Voronoi {
            scale: Self::VORONOI_SCALE,
            plane: ProjectionPlane::default(),
        }
    }

    pub fn hard_threshold() -> Self {
        Self::HardThreshold {
            scale: Self::HARD_THRESHOLD_SCALE,
            threshold: Self::HARD_THRESHOLD,
        }
    }

    pub fn smooth_cell() -> Self {
        Self::SmoothCell {
            scale: Self::SMOOTH_CELL_SCALE,
            threshold: Self::SMOOTH_CELL_THRESHOLD,
            softness: Self::SMOOTH_CELL_SOFTNESS,
        }
    }

    /// Short name used in logs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            StarDensity::Voronoi { .. } => "voronoi",
            StarDensity::HardThreshold { .. } => "hard-threshold",
            StarDensity::SmoothCell { .. } => "smooth-cell",
        }
    }

    /// Same strategy with a different cell scale.
    pub fn with_scale(self, scale: f32) -> Self {
        match self {
            StarDensity::Voronoi { plane, .. } => StarDensity::Voronoi { scale, plane },
            StarDensity::HardThreshold { threshold, .. } => {
                StarDensity::HardThreshold { scale, threshold }
            }
            StarDensity::SmoothCell {
                threshold,
                softness,
                ..
            } => StarDensity::SmoothCell {
                scale,
                threshold,
                softness,
            },
        }
    }

    /// Star intensity in `[0, 1]` for a unit `direction`.
    ///
    /// `star_size` is the per-pixel size threshold; only the Voronoi strategy
    /// reads it.
    #[inline]
    pub fn intensity(&self, direction: Vec3, star_size: f32) -> f32 {
        match *self {
            StarDensity::Voronoi { scale, plane } => {
                let distance = voronoi(plane.project(direction) * scale);
                1.0 - smoothstep(0.0, star_size, distance)
            }
            StarDensity::HardThreshold { scale, threshold } => {
                star_intensity(direction, scale, threshold)
            }
            StarDensity::SmoothCell {
                scale,
                threshold,
                softness,
            } => smooth_star_intensity(direction, scale, threshold, softness),
        }
    }
}

/// Hermite ramp from 0 at `edge0` to 1 at `edge1`, same as WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Single-octave hard star mask: 1.0 where the cell hash clears `threshold`.
#[inline]
pub fn star_intensity(direction: Vec3, scale: f32, threshold: f32) -> f32 {
    let cell = (direction * scale).floor();
    if hash3d(cell) >= threshold { 1.0 } else { 0.0 }
}

/// Per-cell star with soft edges.
///
/// A `softness` that is not positive degrades to the hard cut of
/// [`star_intensity`]; a zero-width `smoothstep` divides by zero.
#[inline]
pub fn smooth_star_intensity(direction: Vec3, scale: f32, threshold: f32, softness: f32) -> f32 {
    let p = direction * scale;
    let cell = p.floor();
    let local = Vec3::new(fract(p.x), fract(p.y), fract(p.z));

    let hash = hash3d(cell);
    let presence = if softness > 0.0 {
        smoothstep(threshold - softness, threshold, hash)
    } else if hash >= threshold {
        1.0
    } else {
        0.0
    };
    let falloff = 1.0 - smoothstep(0.0, 0.5, (local - Vec3::splat(0.5)).length());
    presence * falloff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_directions(n: usize) -> impl Iterator<Item = Vec3> {
        // Fibonacci sphere.
        let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        (0..n).map(move |i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
            let r = (1.0 - y * y).sqrt();
            let theta = golden * i as f32;
            Vec3::new(r * theta.cos(), y, r * theta.sin())
        })
    }

    #[test]
    fn test_zero_softness_is_a_hard_cut() {
        let scale = StarDensity::SMOOTH_CELL_SCALE;
        let dir = Vec3::new(0.31, 0.52, -0.79).normalize();
        let p = dir * scale;
        // Threshold equal to this cell's hash: the degenerate ramp case.
        let threshold = hash3d(p.floor());
        let at = smooth_star_intensity(dir, scale, threshold, 0.0);
        assert!(at.is_finite());

        let local = Vec3::new(fract(p.x), fract(p.y), fract(p.z));
        let falloff = 1.0 - smoothstep(0.0, 0.5, (local - Vec3::splat(0.5)).length());
        assert_eq!(at, falloff);
        assert_eq!(smooth_star_intensity(dir, scale, threshold + 0.01, 0.0), 0.0);
        assert_eq!(smooth_star_intensity(dir, scale, threshold, -1.0), at);
    }

    #[test]
    fn test_with_scale_keeps_other_parameters() {
        let density = StarDensity::smooth_cell().with_scale(50.0);
        assert_eq!(
            density,
            StarDensity::SmoothCell {
                scale: 50.0,
                threshold: StarDensity::SMOOTH_CELL_THRESHOLD,
                softness: StarDensity::SMOOTH_CELL_SOFTNESS,
            }
        );
        assert_eq!(StarDensity::voronoi().with_scale(7.0).name(), "voronoi");
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    }

    #[test]
    fn test_projection_planes() {
        let d = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(ProjectionPlane::Xy.project(d), Vec2::new(1.0, 2.0));
        assert_eq!(ProjectionPlane::Xz.project(d), Vec2::new(1.0, 3.0));
        assert_eq!(ProjectionPlane::Yz.project(d), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_all_strategies_stay_in_unit_range() {
        for density in [
            StarDensity::voronoi(),
            StarDensity::hard_threshold(),
            StarDensity::smooth_cell(),
        ] {
            for dir in sphere_directions(20_000) {
                let i = density.intensity(dir, 0.025);
                assert!(
                    (0.0..=1.0).contains(&i),
                    "{} gave intensity {i} at {dir}",
                    density.name()
                );
            }
        }
    }

    #[test]
    fn test_strategies_are_mostly_space() {
        for density in [
            StarDensity::voronoi(),
            StarDensity::hard_threshold(),
            StarDensity::smooth_cell(),
        ] {
            let n = 50_000;
            let lit = sphere_directions(n)
                .filter(|d| density.intensity(*d, 0.025) > 0.5)
                .count();
            assert!(
                lit * 20 < n,
                "{} lit {lit}/{n} directions, expected a sparse sky",
                density.name()
            );
        }
    }

    #[test]
    fn test_voronoi_finds_some_stars() {
        let density = StarDensity::voronoi();
        let lit = sphere_directions(200_000)
            .filter(|d| density.intensity(*d, 0.04) > 0.0)
            .count();
        assert!(lit > 0, "no stars at all");
    }

    #[test]
    fn test_hard_threshold_is_binary() {
        let density = StarDensity::hard_threshold();
        for dir in sphere_directions(5000) {
            let i = density.intensity(dir, 0.0);
            assert!(i == 0.0 || i == 1.0);
        }
    }

    #[test]
    fn test_hard_threshold_zero_lights_everything() {
        let density = StarDensity::HardThreshold {
            scale: 500.0,
            threshold: 0.0,
        };
        assert!(sphere_directions(100).all(|d| density.intensity(d, 0.0) == 1.0));
    }

    #[test]
    fn test_smooth_cell_fades_toward_cell_edge() {
        // With the threshold out of reach of any hash, presence is 1 everywhere
        // and only the radial falloff remains.
        let scale = 10.0;
        let center = Vec3::splat(2.5) / scale;
        let edge = Vec3::splat(2.02) / scale;
        let at_center = smooth_star_intensity(center, scale, -1.0, 0.5);
        let at_edge = smooth_star_intensity(edge, scale, -1.0, 0.5);
        assert!((at_center - 1.0).abs() < 1e-3, "center = {at_center}");
        assert!(at_edge < 1e-3, "edge = {at_edge}");
    }

    #[test]
    fn test_voronoi_star_size_grows_coverage() {
        let density = StarDensity::voronoi();
        let count = |size: f32| {
            sphere_directions(50_000)
                .filter(|d| density.intensity(*d, size) > 0.0)
                .count()
        };
        assert!(count(0.04) >= count(0.01));
    }

    #[test]
    fn test_names_are_distinct() {
        assert_eq!(StarDensity::default().name(), "voronoi");
        assert_eq!(StarDensity::hard_threshold().name(), "hard-threshold");
        assert_eq!(StarDensity::smooth_cell().name(), "smooth-cell");
    }
}
