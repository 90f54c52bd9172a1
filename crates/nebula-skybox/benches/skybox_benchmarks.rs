use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::{Vec2, Vec3};
use nebula_render::{Camera, Viewport};
use nebula_skybox::*;

fn bench_hash3d(c: &mut Criterion) {
    let p = black_box(Vec3::new(12.0, -47.0, 311.0));
    c.bench_function("hash3d", |bencher| bencher.iter(|| black_box(hash::hash3d(p))));
}

fn bench_voronoi(c: &mut Criterion) {
    let p = black_box(Vec2::new(37.25, -81.5));
    c.bench_function("voronoi", |bencher| bencher.iter(|| black_box(voronoi(p))));
}

fn bench_star_color(c: &mut Criterion) {
    let dir = black_box(Vec3::new(0.3, 0.4, -0.866).normalize());
    for density in [
        StarDensity::voronoi(),
        StarDensity::hard_threshold(),
        StarDensity::smooth_cell(),
    ] {
        let uniforms = SpaceSkyboxUniforms {
            density,
            ..SpaceSkyboxUniforms::default()
        };
        c.bench_function(&format!("star_color_{}", density.name()), |bencher| {
            bencher.iter(|| black_box(evaluate_star_color(dir, &uniforms)))
        });
    }
}

fn bench_fragment(c: &mut Criterion) {
    let view = Camera::default().camera_view(Viewport::from_size(1920, 1080));
    let uniforms = SpaceSkyboxUniforms::default();
    let position = black_box(Vec2::new(640.5, 360.5));
    c.bench_function("skybox_fragment", |bencher| {
        bencher.iter(|| black_box(skybox_fragment(position, &view, &uniforms)))
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let view = Camera::default().camera_view(Viewport::from_size(256, 144));
    let uniforms = SpaceSkyboxUniforms::default();
    c.bench_function("render_frame_256x144", |bencher| {
        bencher.iter(|| black_box(render_frame(&view, &uniforms)))
    });
}

criterion_group!(
    benches,
    bench_hash3d,
    bench_voronoi,
    bench_star_color,
    bench_fragment,
    bench_render_frame
);
criterion_main!(benches);
