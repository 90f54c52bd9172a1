//! Offline skybox renderer.
//!
//! Renders one frame of the procedural star field to a PNG and optionally bakes
//! the sky into six cubemap face images. With `--watch` it keeps polling
//! `config.ron` and re-renders on every change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use glam::{EulerRot, Quat, Vec3};
use nebula_config::{CameraConfig, CliArgs, Config, ConfigError};
use nebula_render::{Camera, Exposure, Projection, Viewport};
use nebula_skybox::{FACE_NAMES, SkyCubemap, SkyboxError, SpaceSkyboxUniforms, render_frame};
use tracing::{error, info, warn};

/// How often `--watch` re-reads the config file.
const WATCH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("could not resolve a config directory; pass --config")]
    NoConfigDir,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Skybox(#[from] SkyboxError),

    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a render run wrote to disk.
#[derive(Debug)]
struct RenderOutput {
    frame: PathBuf,
    cubemap_faces: Vec<PathBuf>,
}

/// Camera described by `camera`, with its aspect matched to the frame.
fn build_camera(camera: &CameraConfig, width: u32, height: u32) -> Camera {
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        camera.yaw_deg.to_radians(),
        camera.pitch_deg.to_radians(),
        0.0,
    );
    Camera {
        position: Vec3::from_array(camera.position),
        rotation,
        projection: Projection::InfinitePerspective {
            fov_y: camera.fov_y_deg.to_radians(),
            aspect_ratio: width as f32 / height.max(1) as f32,
        },
        near: camera.near,
        ..Camera::default()
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), DemoError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

fn create_dir(path: &Path) -> Result<(), DemoError> {
    std::fs::create_dir_all(path).map_err(|source| DemoError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn render(config: &Config) -> Result<RenderOutput, DemoError> {
    let output = &config.output;
    let camera = build_camera(&config.camera, output.width, output.height);
    let exposure = Exposure {
        ev100: config.camera.ev100,
    };
    let uniforms = SpaceSkyboxUniforms::extract(&config.skybox, Some(&exposure));
    info!(
        strategy = uniforms.density.name(),
        brightness = uniforms.brightness,
        "Rendering {}x{} skybox",
        output.width,
        output.height
    );

    let view = camera.camera_view(Viewport::from_size(output.width, output.height));
    let frame = render_frame(&view, &uniforms)?;
    ensure_parent_dir(&output.path)?;
    frame.save(&output.path).map_err(SkyboxError::from)?;
    info!("Wrote {}", output.path.display());

    let mut cubemap_faces = Vec::new();
    if output.cubemap_face_size > 0 {
        let cubemap = SkyCubemap::bake(&uniforms, output.cubemap_face_size)?;
        create_dir(&output.cubemap_dir)?;
        for (face_index, name) in FACE_NAMES.iter().enumerate() {
            let path = output.cubemap_dir.join(format!("{name}.png"));
            cubemap
                .face_image(face_index)
                .save(&path)
                .map_err(SkyboxError::from)?;
            cubemap_faces.push(path);
        }
        info!(
            "Wrote {} cubemap faces ({} lit texels) to {}",
            cubemap_faces.len(),
            cubemap.lit_texels(),
            output.cubemap_dir.display()
        );
    }

    Ok(RenderOutput {
        frame: output.path.clone(),
        cubemap_faces,
    })
}

/// Re-read the config file and re-render if it changed since `file_config`.
///
/// `file_config` holds the file contents without CLI overrides so that the
/// overrides alone never count as a change.
fn rerender_on_change(
    file_config: &mut Config,
    config_dir: &Path,
    args: &CliArgs,
) -> Result<Option<RenderOutput>, DemoError> {
    let Some(changed) = file_config.reload(config_dir)? else {
        return Ok(None);
    };
    *file_config = changed;
    let mut config = file_config.clone();
    config.apply_cli_overrides(args);
    render(&config).map(Some)
}

fn run(args: &CliArgs) -> Result<(), DemoError> {
    // Resolve config directory
    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => dirs::config_dir()
            .ok_or(DemoError::NoConfigDir)?
            .join("nebula-skybox"),
    };

    // Load or create config, then apply CLI overrides
    let mut file_config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = file_config.clone();
    config.apply_cli_overrides(args);

    let log_dir = config_dir.join("logs");
    nebula_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!("Using config from {}", config_dir.display());

    let output = render(&config)?;
    info!(
        frame = %output.frame.display(),
        faces = output.cubemap_faces.len(),
        "Skybox render complete"
    );

    if !args.watch {
        return Ok(());
    }
    info!("Watching {} for changes", config_dir.join("config.ron").display());
    loop {
        std::thread::sleep(WATCH_INTERVAL);
        match rerender_on_change(&mut file_config, &config_dir, args) {
            Ok(Some(output)) => {
                info!(frame = %output.frame.display(), "Re-rendered after config change")
            }
            Ok(None) => {}
            // A half-written or invalid file; keep the last good config.
            Err(e) => warn!("{e}"),
        }
    }
}

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        // Logging may not be up yet.
        eprintln!("nebula-skybox: {e}");
        error!("{e}");
        std::process::exit(1);
    }
}
