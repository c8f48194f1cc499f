//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with human-readable or JSON output. Logs go
//! to stderr; stdout carries command output only.

use crate::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global subscriber.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Initialize from the `[logging]` config table plus CLI overrides.
pub fn init_from_config(config: &LoggingConfig, verbose: bool, json_logs: bool) {
    init(
        effective_level(config, verbose),
        json_logs || config.format == "json",
    );
}

/// `-v` raises the level to debug, but never lowers a more verbose setting.
fn effective_level(config: &LoggingConfig, verbose: bool) -> &str {
    if verbose && config.level != "trace" {
        "debug"
    } else {
        &config.level
    }
}
