//! Tracing setup. Logs go to stderr; stdout carries only result lines.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: Level) -> String {
    format!("{},sqlx=warn", level.as_str().to_ascii_lowercase())
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
