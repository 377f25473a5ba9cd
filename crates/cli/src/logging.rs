use crate::enums::LogLevel;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NODEKIT_LOG";

/// Log to stderr, so the output of child processes on stdout is untouched.
/// Directives in `NODEKIT_LOG` take precedence over the `--log` level.
pub fn setup_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("nodekit={level}")));

    // Ignore failures when a subscriber was already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
