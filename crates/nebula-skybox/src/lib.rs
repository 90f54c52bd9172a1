//! Procedural space skybox: an infinitely distant star field drawn behind the
//! scene with one full-screen triangle.
//!
//! The sky is a pure function of the view direction. The GPU pass
//! ([`SpaceSkyboxRenderer`]) and the CPU paths ([`render_frame`],
//! [`SkyCubemap::bake`]) share the same constants and math.

pub mod cubemap;
pub mod density;
pub mod error;
pub mod evaluator;
pub mod fullscreen;
pub mod hash;
pub mod ray;
pub mod renderer;
pub mod shader;
pub mod software;
pub mod voronoi;

pub use cubemap::{FACE_NAMES, MAX_FACE_SIZE, SkyCubemap, direction_to_cube_face_uv};
pub use density::{ProjectionPlane, StarDensity};
pub use error::SkyboxError;
pub use evaluator::{
    SkyboxUniformsGpu, SpaceSkybox, SpaceSkyboxUniforms, evaluate_star_color, skybox_fragment,
    star_size_threshold,
};
pub use fullscreen::{FULLSCREEN_TRIANGLE_VERTEX_COUNT, fullscreen_triangle_vertex};
pub use ray::reconstruct_ray_direction;
pub use renderer::{HDR_TEXTURE_FORMAT, SpaceSkyboxPipelineKey, SpaceSkyboxRenderer};
pub use shader::SPACE_SKYBOX_SHADER_SOURCE;
pub use software::{MAX_FRAME_DIMENSION, color_to_rgba8, render_frame};
pub use voronoi::voronoi;
