//! Diagnostic logging setup.
//!
//! Log lines go to stderr so stdout carries only the chronicle. Targets used
//! across the crate: `events`, `world`, `dynasty`, `marriage`, `simulation`.

use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Parses a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`),
/// falling back to `warn`.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or(LevelFilter::WARN)
}

/// Installs the global fmt subscriber. A second call leaves the first
/// subscriber in place.
pub fn init(level: &str) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    if installed.is_err() {
        tracing::debug!(target: "simulation", "Logging already initialized");
    }
}
