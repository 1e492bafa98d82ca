//! Logging setup shared by the calmirror binaries and tests.
//!
//! Everything logs through `tracing`; this module only installs the subscriber.

use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber from a configured level name.
///
/// Unknown names fall back to INFO.
pub fn init_from_name(level: Option<&str>) {
    let level = level
        .and_then(|name| Level::from_str(name).ok())
        .unwrap_or(Level::INFO);
    init_with_level(level);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured on top of the `calmirror=<level>` default.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("calmirror={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
