use crate::core::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the process-wide fmt subscriber.
///
/// An invalid filter directive falls back to `info`. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_logging(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
