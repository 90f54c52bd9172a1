//! Camera and per-frame view data shared by the render passes.

pub mod camera;
pub mod view;

pub use camera::{Camera, DEFAULT_EV100, Exposure, Projection};
pub use view::{CameraView, ViewUniform, Viewport, coords_to_viewport_uv};
