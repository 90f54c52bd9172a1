//! Per-pixel world-space ray directions.
//!
//! The direction is rebuilt from the inverse projection and the camera rotation
//! only. Subtracting the camera position from a reconstructed world position
//! loses all precision once the camera is far from the origin; transforming a
//! view-space direction with w = 0 never touches the translation at all.

use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};
use nebula_render::{CameraView, coords_to_viewport_uv};

/// Normalized world-space direction from the camera through `position`.
///
/// `position` is a framebuffer coordinate, usually a pixel center. The clip
/// position sits on the near plane (z = 1 under reverse-Z): with an infinite
/// projection the far plane is at infinity and would divide by zero.
///
/// The projection in `view` must be invertible; a degenerate one yields NaN.
#[inline]
pub fn reconstruct_ray_direction(position: Vec2, view: &CameraView) -> Vec3 {
    let uv = coords_to_viewport_uv(position, &view.viewport);
    let clip_xy = uv * Vec2::new(2.0, -2.0) + Vec2::new(-1.0, 1.0);

    let view_position = view.inverse_projection * Vec4::new(clip_xy.x, clip_xy.y, 1.0, 1.0);
    let view_direction = view_position.xyz() / view_position.w;

    let world_direction = view.world_from_view * view_direction.extend(0.0);
    world_direction.xyz().normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{EulerRot, Mat4, Quat};
    use nebula_render::{Camera, Projection, Viewport};

    fn symmetric_view() -> CameraView {
        CameraView {
            inverse_projection: Mat4::perspective_infinite_reverse_rh(
                std::f32::consts::FRAC_PI_2,
                1.0,
                0.1,
            )
            .inverse(),
            world_from_view: Mat4::IDENTITY,
            viewport: Viewport::from_size(800, 800),
        }
    }

    fn grid(viewport: &Viewport, steps: u32) -> impl Iterator<Item = Vec2> + '_ {
        (0..=steps).flat_map(move |j| {
            (0..=steps).map(move |i| {
                Vec2::new(
                    viewport.x + viewport.width * i as f32 / steps as f32,
                    viewport.y + viewport.height * j as f32 / steps as f32,
                )
            })
        })
    }

    #[test]
    fn test_center_pixel_looks_forward() {
        let view = symmetric_view();
        let dir = reconstruct_ray_direction(view.viewport.center(), &view);
        assert!((dir - Vec3::NEG_Z).length() < 1e-5, "center ray = {dir}");
    }

    #[test]
    fn test_top_left_points_up_and_left() {
        let view = symmetric_view();
        let dir = reconstruct_ray_direction(Vec2::ZERO, &view);
        // Screen y grows downward, clip y upward.
        assert!(dir.x < 0.0 && dir.y > 0.0 && dir.z < 0.0, "top-left ray = {dir}");
        // 90 degree fov on a square viewport: the corner ray is (-1, 1, -1) normalized.
        assert!((dir - Vec3::new(-1.0, 1.0, -1.0).normalize()).length() < 1e-4);
    }

    #[test]
    fn test_rays_are_unit_length() {
        let camera = Camera {
            position: Vec3::new(12.0, -400.0, 3.5),
            rotation: Quat::from_euler(EulerRot::YXZ, 1.1, 0.4, 0.2),
            ..Camera::default()
        };
        let viewport = Viewport {
            x: 32.0,
            y: 16.0,
            width: 1280.0,
            height: 720.0,
        };
        let view = camera.camera_view(viewport);
        for position in grid(&viewport, 24) {
            let dir = reconstruct_ray_direction(position, &view);
            assert!(
                (dir.length() - 1.0).abs() < 1e-5,
                "ray at {position} has length {}",
                dir.length()
            );
        }
    }

    #[test]
    fn test_follows_camera_rotation() {
        let camera = Camera {
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let view = camera.camera_view(Viewport::from_size(640, 480));
        let dir = reconstruct_ray_direction(view.viewport.center(), &view);
        assert!((dir - camera.forward()).length() < 1e-5);
    }

    #[test]
    fn test_large_translation_gives_identical_rays() {
        let rotation = Quat::from_euler(EulerRot::YXZ, -0.8, 0.3, 0.0);
        let near = Camera {
            rotation,
            ..Camera::default()
        };
        let far = Camera {
            position: Vec3::new(1.0e6, -1.0e6, 1.0e6),
            rotation,
            ..Camera::default()
        };
        let viewport = Viewport::from_size(1920, 1080);
        let near_view = near.camera_view(viewport);
        let far_view = far.camera_view(viewport);

        for position in grid(&viewport, 16) {
            assert_eq!(
                reconstruct_ray_direction(position, &near_view),
                reconstruct_ray_direction(position, &far_view),
                "ray at {position} moved with the camera"
            );
        }
    }

    #[test]
    fn test_small_screen_offsets_give_small_direction_changes() {
        let view = Camera::default().camera_view(Viewport::from_size(1920, 1080));
        for position in grid(&view.viewport, 12) {
            let a = reconstruct_ray_direction(position, &view);
            let b = reconstruct_ray_direction(position + Vec2::new(0.25, -0.25), &view);
            // A quarter pixel at 45 degrees over 1080 rows is well under 1e-3 rad.
            assert!((a - b).length() < 1e-3, "jump at {position}: {a} -> {b}");
        }
    }

    #[test]
    fn test_viewport_origin_is_respected() {
        let camera = Camera::default();
        let at_origin = camera.camera_view(Viewport::from_size(400, 300));
        let offset = camera.camera_view(Viewport {
            x: 200.0,
            y: 100.0,
            width: 400.0,
            height: 300.0,
        });
        let a = reconstruct_ray_direction(Vec2::new(10.5, 20.5), &at_origin);
        let b = reconstruct_ray_direction(Vec2::new(210.5, 120.5), &offset);
        assert!((a - b).length() < 1e-6);
    }

    #[test]
    fn test_finite_projection_also_works() {
        let camera = Camera {
            projection: Projection::Perspective {
                fov_y: 1.0,
                aspect_ratio: 1.5,
            },
            ..Camera::default()
        };
        let view = camera.camera_view(Viewport::from_size(600, 400));
        let dir = reconstruct_ray_direction(view.viewport.center(), &view);
        assert!((dir - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_degenerate_projection_is_not_finite() {
        let view = CameraView {
            inverse_projection: Mat4::ZERO,
            world_from_view: Mat4::IDENTITY,
            viewport: Viewport::from_size(10, 10),
        };
        let dir = reconstruct_ray_direction(Vec2::new(5.0, 5.0), &view);
        assert!(!dir.is_finite());
    }
}
