//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter applied when `RUST_LOG` is unset: third-party crates stay at
/// `warn`, the codereel crates follow the configured level.
fn default_filter(level: &str) -> String {
    format!(
        "warn,codereel={level},codereel_common={level},codereel_media_model={level},codereel_capture_engine={level}"
    )
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Human-readable output goes to stderr, JSON to stdout. A configured
/// log file takes precedence over both and is appended without ANSI
/// color.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let log_file = config.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("codereel: cannot open log file {}: {e}", path.display()))
            .ok()
    });

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let result = match (log_file, config.json) {
        (Some(file), true) => tracing::subscriber::set_global_default(
            builder.json().with_writer(Mutex::new(file)).finish(),
        ),
        (Some(file), false) => tracing::subscriber::set_global_default(
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish(),
        ),
        (None, true) => tracing::subscriber::set_global_default(builder.json().finish()),
        (None, false) => {
            tracing::subscriber::set_global_default(builder.with_writer(io::stderr).finish())
        }
    };
    result.ok();
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_third_party_crates() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("codereel_capture_engine=debug"));
    }

    #[test]
    fn test_init_logging_creates_the_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codereel.log");
        init_logging(&LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: Some(path.clone()),
        });
        assert!(path.exists());
    }
}
