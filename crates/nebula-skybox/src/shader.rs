//! WGSL source for the space skybox pass.
//!
//! Every function here has a CPU twin in this crate with the same constants:
//! `skybox_vertex` / [`crate::fullscreen_triangle_vertex`],
//! `skybox_ray_direction` / [`crate::reconstruct_ray_direction`],
//! `hash2d`, `hash3d`, `random2d` / [`crate::hash`], `voronoi` / [`crate::voronoi()`],
//! `star_density` / [`crate::StarDensity::intensity`] and `skybox_fragment` /
//! [`crate::skybox_fragment`].

/// Vertex entry point name.
pub const VERTEX_ENTRY_POINT: &str = "skybox_vertex";
/// Fragment entry point name.
pub const FRAGMENT_ENTRY_POINT: &str = "skybox_fragment";

/// WGSL shader source for the space skybox pass.
pub const SPACE_SKYBOX_SHADER_SOURCE: &str = r#"
struct View {
    inverse_projection: mat4x4<f32>,
    world_from_view: mat4x4<f32>,
    viewport: vec4<f32>,
};

struct SpaceSkyboxUniforms {
    star_color: vec3<f32>,
    brightness: f32,
    space_color: vec3<f32>,
    scale: f32,
    threshold: f32,
    softness: f32,
    strategy: u32,
    plane: u32,
};

// Cubemap pair for the texture-sampled sky. The procedural path below does not read them.
@group(0) @binding(0) var skybox_texture: texture_cube<f32>;
@group(0) @binding(1) var skybox_sampler: sampler;
@group(0) @binding(2) var<uniform> view: View;
@group(0) @binding(3) var<uniform> uniforms: SpaceSkyboxUniforms;

fn hash_fract(x: f32) -> f32 {
    let f = x - floor(x);
    return select(f, 0.0, f >= 1.0);
}

fn hash2d(p: vec2<f32>) -> vec2<f32> {
    let q = vec2<f32>(dot(p, vec2<f32>(127.1, 311.7)), dot(p, vec2<f32>(269.5, 183.3)));
    let s = sin(q) * 43758.5453;
    return vec2<f32>(hash_fract(s.x), hash_fract(s.y));
}

fn hash3d(p: vec3<f32>) -> f32 {
    return hash_fract(sin(dot(p, vec3<f32>(127.1, 311.7, 74.7))) * 43758.5453);
}

fn random2d(p: vec2<f32>) -> f32 {
    return hash_fract(sin(dot(p, vec2<f32>(12.9898, 78.233))) * 43758.5453);
}

fn voronoi(p: vec2<f32>) -> f32 {
    let cell_id = floor(p);
    let frac_p = p - cell_id;

    var min_dist_sq = 3.40282347e+38;
    for (var y = -1; y <= 1; y++) {
        for (var x = -1; x <= 1; x++) {
            let neighbor = vec2<f32>(f32(x), f32(y));
            let jittered = neighbor + hash2d(cell_id + neighbor) - frac_p;
            min_dist_sq = min(min_dist_sq, dot(jittered, jittered));
        }
    }
    return sqrt(min_dist_sq);
}

fn project_plane(dir: vec3<f32>, plane: u32) -> vec2<f32> {
    var p = dir.xz;
    if (plane == 0u) {
        p = dir.xy;
    } else if (plane == 2u) {
        p = dir.yz;
    }
    return p;
}

fn star_intensity(dir: vec3<f32>, scale: f32, threshold: f32) -> f32 {
    return step(threshold, hash3d(floor(dir * scale)));
}

fn smooth_star_intensity(dir: vec3<f32>, scale: f32, threshold: f32, softness: f32) -> f32 {
    let p = dir * scale;
    let cell_id = floor(p);
    let frac_p = vec3<f32>(hash_fract(p.x), hash_fract(p.y), hash_fract(p.z));

    let h = hash3d(cell_id);
    var presence = step(threshold, h);
    if (softness > 0.0) {
        presence = smoothstep(threshold - softness, threshold, h);
    }
    let falloff = 1.0 - smoothstep(0.0, 0.5, length(frac_p - vec3<f32>(0.5)));
    return presence * falloff;
}

fn star_density(dir: vec3<f32>, star_size: f32) -> f32 {
    if (uniforms.strategy == 1u) {
        return star_intensity(dir, uniforms.scale, uniforms.threshold);
    }
    if (uniforms.strategy == 2u) {
        return smooth_star_intensity(dir, uniforms.scale, uniforms.threshold, uniforms.softness);
    }
    let dist = voronoi(project_plane(dir, uniforms.plane) * uniforms.scale);
    return 1.0 - smoothstep(0.0, star_size, dist);
}

fn coords_to_viewport_uv(position: vec2<f32>, viewport: vec4<f32>) -> vec2<f32> {
    return (position - viewport.xy) / viewport.zw;
}

// Near plane (z = 1 under reverse-Z) and w = 0 for the world transform: the
// direction never depends on the camera translation.
fn skybox_ray_direction(position: vec2<f32>) -> vec3<f32> {
    let uv = coords_to_viewport_uv(position, view.viewport);
    let clip_xy = uv * vec2<f32>(2.0, -2.0) + vec2<f32>(-1.0, 1.0);
    let view_position = view.inverse_projection * vec4<f32>(clip_xy, 1.0, 1.0);
    let view_direction = view_position.xyz / view_position.w;
    let world_direction = view.world_from_view * vec4<f32>(view_direction, 0.0);
    return normalize(world_direction.xyz);
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
};

@vertex
fn skybox_vertex(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    // (-1,-1), (3,-1), (-1,3) on the far plane.
    let clip_position = vec4<f32>(
        f32(vertex_index & 1u),
        f32((vertex_index >> 1u) & 1u),
        0.25,
        0.5,
    ) * 4.0 - vec4<f32>(1.0);

    var out: VertexOutput;
    out.position = clip_position;
    return out;
}

@fragment
fn skybox_fragment(in: VertexOutput) -> @location(0) vec4<f32> {
    let dir = skybox_ray_direction(in.position.xy);
    let star_size = 0.01 + random2d(dir.xz) * 0.03;
    let intensity = star_density(dir, star_size);
    let color = mix(uniforms.space_color, uniforms.star_color, intensity);
    return vec4<f32>(color * uniforms.brightness, 1.0);
}
"#;
