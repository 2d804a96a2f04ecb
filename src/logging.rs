//! Diagnostic logging setup
//!
//! Library code only emits `tracing` events; the binary installs one
//! subscriber that writes to stderr so command output on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pick the filter directive for a `-v` count
///
/// Zero means "use the configured level".
pub fn verbosity_directive(default_level: &str, verbosity: u8) -> String {
    match verbosity {
        0 => default_level.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise the `-v` count, then `default_level`.
/// An unparsable level falls back to `warn`. Calling this twice is a no-op.
pub fn init_logging(default_level: &str, verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(verbosity_directive(default_level, verbosity))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
