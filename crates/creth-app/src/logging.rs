//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` first, then `creth=<level>` from config.
pub fn env_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    let directive = format!("creth={}", config.log_level).parse()?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Install the global fmt subscriber.
///
/// Returns `Ok(false)` if a subscriber was already installed (tests, embedders).
pub fn init(config: &LoggingConfig) -> anyhow::Result<bool> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .try_init()
        .is_ok();
    Ok(installed)
}
