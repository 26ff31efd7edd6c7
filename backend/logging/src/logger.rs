//! Structured Logger
//!
//! Wraps `tracing` to provide console output (plain or JSON), an optional
//! daily-rotated NDJSON file, and environment-based level control.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use textlens_config::LoggingConfig;

/// File name prefix inside the log directory: `textlens.log.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "textlens.log";

/// Initialize the global logger. `RUST_LOG` overrides `config.level`.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_logger(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = if config.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    let file_layer = config.dir.as_ref().map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
