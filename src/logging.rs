//! Logging setup for the mtree binary
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. Logs go to stderr so stdout stays machine-readable.

use crate::{Error, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding an `EnvFilter` directive, e.g. `mtree=debug`
pub const LOG_ENV: &str = "MTREE_LOG";

/// Level used when `MTREE_LOG` is unset, from the number of `-v` flags
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "off",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter: `MTREE_LOG` wins over the verbosity level
pub fn build_env_filter(verbosity: u8) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .map_err(|e| Error::Config(format!("Invalid {} value '{}': {}", LOG_ENV, directives, e))),
        _ => EnvFilter::try_new(level_for_verbosity(verbosity))
            .map_err(|e| Error::Config(format!("Invalid log level: {}", e))),
    }
}

/// Install the global subscriber
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = build_env_filter(verbosity)?;

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}
