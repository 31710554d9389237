// src/logging.rs

//! Logging setup for `waybridge` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. the `-verbose <n>` severity mapping (if provided)
//! 2. `WAYBRIDGE_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs go to STDERR so the session's stdout stays untouched. Color is
//! dropped automatically when stderr is not a terminal or `NO_COLOR` is set.

use std::io::IsTerminal;

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(verbosity: Option<u8>) -> Result<()> {
    let level = match verbosity {
        Some(level) => cli::verbosity_level(level),
        None => std::env::var("WAYBRIDGE_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(color_enabled())
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn color_enabled() -> bool {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    !no_color && std::io::stderr().is_terminal()
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
