//! Structured logging for the skybox renderer.
//!
//! Installs a `tracing` subscriber with console output and, in debug builds, a
//! JSON log file. Library crates log through the `log` facade; `tracing-subscriber`
//! picks those records up alongside native `tracing` events.

use nebula_config::Config;
use std::path::Path;
use std::fs::File;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "skybox.log";

/// Filter directives for `config`: its `debug.log_level` when set, otherwise
/// [`DEFAULT_FILTER`].
pub fn filter_directives(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the config's log level. With `debug_build`
/// and a `log_dir`, events are also written as JSON to [`LOG_FILE_NAME`] in that
/// directory; if the file cannot be created only the console layer is installed.
///
/// ```no_run
/// use nebula_config::Config;
/// use nebula_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true) // rayon workers are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some(log_file) = create_log_file(log_dir)
    {
        subscriber.with(json_file_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// Create `log_dir` and a fresh [`LOG_FILE_NAME`] inside it.
fn create_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE_NAME)).ok()
}

/// One JSON object per event, no ANSI codes.
fn json_file_layer<S>(log_file: File) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_directives_without_config() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_config_log_level_overrides_default() {
        let mut config = Config::default();
        config.debug.log_level = "debug,nebula_skybox=trace".to_string();
        assert_eq!(filter_directives(Some(&config)), "debug,nebula_skybox=trace");
    }

    #[test]
    fn test_blank_config_log_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directives(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_subsystem_filter_parses() {
        for filter_str in [
            "info",
            "debug,nebula_skybox=trace",
            "warn,nebula_config=debug,wgpu=error",
        ] {
            assert!(
                EnvFilter::try_new(filter_str).is_ok(),
                "Failed to parse filter: {}",
                filter_str
            );
        }
    }

    #[test]
    fn test_log_file_created_in_nested_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("config").join("logs");
        assert!(create_log_file(&log_dir).is_some());
        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_file_layer_writes_json_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_file = create_log_file(temp_dir.path()).unwrap();
        let subscriber = tracing_subscriber::registry().with(json_file_layer(log_file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "nebula_skybox::cubemap", faces = 6, "baked");
            tracing::debug!("second event");
        });

        let contents = std::fs::read_to_string(temp_dir.path().join(LOG_FILE_NAME)).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "INFO");
        assert_eq!(lines[0]["target"], "nebula_skybox::cubemap");
        assert_eq!(lines[0]["fields"]["message"], "baked");
        assert_eq!(lines[0]["fields"]["faces"], 6);
        assert!(!contents.contains('\u{1b}'), "ANSI escapes in log file");
    }
}
