//! Logging setup for the placedesk binary
//!
//! Console output goes to stderr so command output on stdout stays clean.
//! JSON logs are optionally written to a daily rolling file. `RUST_LOG`
//! takes precedence over the configured filter.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory where log files should be written
    pub log_dir: PathBuf,

    /// Whether to write JSON logs to files
    pub enable_json_logs: bool,

    /// Whether to include file/line information in console logs
    pub include_location: bool,

    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl LoggingConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            log_dir: settings.log_dir(),
            enable_json_logs: settings.json_logs,
            include_location: cfg!(debug_assertions),
            default_filter: settings.log_filter.clone(),
        }
    }
}

/// Initialize the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the program.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(console_layer);

    let mut guard = None;
    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "placedesk.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "Logging initialized"
    );

    Ok(guard)
}
