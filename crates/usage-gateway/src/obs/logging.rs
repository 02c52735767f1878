//! Tracing subscriber setup: line-delimited JSON on stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogLevel;

/// Install the global subscriber at the configured level.
///
/// Returns `false` if a subscriber was already installed (tests, embedding).
pub fn init_tracing(level: LogLevel) -> bool {
    let filter = EnvFilter::new(level.as_str());
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
