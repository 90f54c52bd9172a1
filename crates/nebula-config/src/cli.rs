//! Command-line argument parsing for the skybox renderer.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nebula_skybox::StarDensity;

use crate::Config;

/// Star density strategy names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Voronoi,
    HardThreshold,
    SmoothCell,
}

impl StrategyArg {
    /// The strategy with its default parameters.
    pub fn density(self) -> StarDensity {
        match self {
            StrategyArg::Voronoi => StarDensity::voronoi(),
            StrategyArg::HardThreshold => StarDensity::hard_threshold(),
            StrategyArg::SmoothCell => StarDensity::smooth_cell(),
        }
    }
}

/// Skybox renderer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nebula-skybox", about = "Render a procedural star field")]
pub struct CliArgs {
    /// Frame width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Output PNG path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Star density strategy.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Cell scale of the star density.
    #[arg(long)]
    pub density_scale: Option<f32>,

    /// Sky brightness before exposure.
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Camera yaw in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub yaw: Option<f32>,

    /// Camera pitch in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub pitch: Option<f32>,

    /// Vertical field of view in degrees.
    #[arg(long)]
    pub fov: Option<f32>,

    /// Also bake and export a cubemap with this face size.
    #[arg(long)]
    pub cubemap_size: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Keep running and re-render whenever `config.ron` changes.
    #[arg(long)]
    pub watch: bool,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.output.width = w;
        }
        if let Some(h) = args.height {
            self.output.height = h;
        }
        if let Some(ref path) = args.output {
            self.output.path = path.clone();
        }
        if let Some(strategy) = args.strategy {
            self.skybox.density = strategy.density();
        }
        // After the strategy so the scale lands on the selected one.
        if let Some(scale) = args.density_scale {
            self.skybox.density = self.skybox.density.with_scale(scale);
        }
        if let Some(brightness) = args.brightness {
            self.skybox.brightness = brightness;
        }
        if let Some(yaw) = args.yaw {
            self.camera.yaw_deg = yaw;
        }
        if let Some(pitch) = args.pitch {
            self.camera.pitch_deg = pitch;
        }
        if let Some(fov) = args.fov {
            self.camera.fov_y_deg = fov;
        }
        if let Some(size) = args.cubemap_size {
            self.output.cubemap_face_size = size;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            strategy: Some(StrategyArg::HardThreshold),
            density_scale: Some(300.0),
            yaw: Some(-45.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.output.width, 1920);
        assert_eq!(config.camera.yaw_deg, -45.0);
        assert_eq!(
            config.skybox.density,
            StarDensity::HardThreshold {
                scale: 300.0,
                threshold: StarDensity::HARD_THRESHOLD
            }
        );
        // Non-overridden fields retain defaults
        assert_eq!(config.output.height, 720);
        assert_eq!(config.skybox.brightness, 1000.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_strategy_names() {
        let args = CliArgs::try_parse_from([
            "nebula-skybox",
            "--strategy",
            "smooth-cell",
            "--pitch",
            "-30",
            "-o",
            "out.png",
        ])
        .unwrap();
        assert_eq!(args.strategy, Some(StrategyArg::SmoothCell));
        assert_eq!(args.pitch, Some(-30.0));
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
        assert!(!args.watch);
        assert!(CliArgs::try_parse_from(["nebula-skybox", "--watch"]).unwrap().watch);
        assert!(CliArgs::try_parse_from(["nebula-skybox", "--strategy", "perlin"]).is_err());
    }
}
