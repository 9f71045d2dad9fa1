//! Logging setup

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Send logs to stderr, at DEBUG when verbose and WARN otherwise
///
/// `RUST_LOG` directives are honoured on top of the chosen level.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
