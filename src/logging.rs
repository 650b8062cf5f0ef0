//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! - `warn`: degraded loads (unresolved fields, inverted date ranges)
//! - `info`: load and fetch progress
//! - `debug`: column mapping, per-value normalization failures
//!
//! `RUST_LOG` overrides the level chosen on the command line.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level for a `-v` count: 0 → warn, 1 → info, 2 → debug, more → trace.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn so HTTP internals don't drown the output.
        EnvFilter::new(format!(
            "warn,draws_report={level}",
            level = level.as_str().to_lowercase()
        ))
    })
}

/// Install the global subscriber, writing to stderr. Call once at startup.
pub fn init_logging(verbosity: u8) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    tracing_subscriber::registry()
        .with(build_env_filter(level_from_verbosity(verbosity)))
        .with(layer)
        .init();
}
