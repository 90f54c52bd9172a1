//! Configuration for the skybox renderer.
//!
//! Settings persist to disk as RON files and can be overridden from the
//! command line via clap. Unknown and missing fields are tolerated so config
//! files stay compatible across versions.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, StrategyArg};
pub use config::{CameraConfig, Config, DebugConfig, OutputConfig};
pub use error::ConfigError;
