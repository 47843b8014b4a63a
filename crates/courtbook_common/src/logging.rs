//! Logging utilities for the Courtbook application.
//!
//! This module provides a standardized approach to logging across all crates
//! in the workspace. It installs the tracing subscriber once at startup, with
//! an optional daily rolling log file next to the console output.

use courtbook_config::LoggingConfig;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix used by the rolling file appender.
pub const LOG_FILE_PREFIX: &str = "courtbook.log";

/// Initialize the tracing subscriber from the `[logging]` config section.
///
/// Unknown level names fall back to INFO. When a log directory is configured
/// the returned guard must be held for as long as logs should be flushed to
/// the file, typically for the lifetime of `main`.
pub fn init_with_config(config: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let level = config
        .and_then(|c| c.level.as_deref())
        .and_then(|l| Level::from_str(l).ok())
        .unwrap_or(Level::INFO);
    let directory = config.and_then(|c| c.directory.as_deref());
    install(level, directory)
}

/// Targets that log at the configured level when `RUST_LOG` is unset.
///
/// `tower_http` carries the request spans of the HTTP trace layer.
pub fn default_directives(level: Level) -> String {
    let level = LevelFilter::from_level(level);
    format!("courtbook={level},tower_http={level}")
}

// RUST_LOG, when set and valid, replaces the defaults entirely
fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn install(level: Level, directory: Option<&str>) -> Option<WorkerGuard> {
    let filter = build_filter(level);

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(file_layer)
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
    guard
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so the call can sit inside a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
