//! Logging configuration.
//!
//! Notification output goes to stdout, so logs go to stderr and default
//! to warnings only.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Log level can be controlled via the `PHOTOTZ_LOG` environment variable:
/// - `PHOTOTZ_LOG=debug` for per-attempt retry detail
/// - `PHOTOTZ_LOG=info` for session-level messages
/// - `PHOTOTZ_LOG=warn` for warnings and errors only (default)
pub fn init() {
    let env_filter =
        EnvFilter::try_from_env("PHOTOTZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .init();
}
