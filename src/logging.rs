use crate::models::LoggingSettings;
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup logging with a daily rotating file appender and optional console output.
///
/// `RUST_LOG` overrides the level chosen by `debug_mode` when it is set.
///
/// # Arguments
/// * `settings` - Log directory, file prefix, debug level and console switch
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(settings: &LoggingSettings) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_path = ensure_log_dir(&settings.log_dir)?;

    let file_appender = rolling::daily(&log_path, &settings.log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let registry = tracing_subscriber::registry()
        .with(env_filter(settings.debug_mode))
        .with(file_layer);

    if settings.console_output {
        // Console goes to stderr so command output on stdout stays clean
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        registry
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        settings.log_dir,
        settings.log_prefix,
        settings.debug_mode,
        settings.console_output
    );

    Ok(guard)
}

fn env_filter(debug_mode: bool) -> EnvFilter {
    let default_level = if debug_mode { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Create the log directory if it doesn't exist.
fn ensure_log_dir(log_dir: &str) -> Result<Utf8PathBuf> {
    let log_path = Utf8PathBuf::from(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(&log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    #[allow(unused_variables)]
    fn test_setup_logging() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        let settings = LoggingSettings {
            log_dir: log_dir.to_str().unwrap().to_string(),
            log_prefix: "test".to_string(),
            debug_mode: false,
            console_output: false,
        };

        // The subscriber may already be installed by another test in this
        // process, but the directory is created either way
        let result = setup_logging(&settings);

        assert!(log_dir.exists());
    }

    #[test]
    fn test_log_directory_created() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");

        let created = ensure_log_dir(log_dir.to_str().unwrap()).unwrap();

        assert!(created.exists());
        assert!(log_dir.exists());
    }
}
