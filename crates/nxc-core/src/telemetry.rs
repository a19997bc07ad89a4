//! Logging bootstrap.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Installs a global `tracing` subscriber filtered by `config.level`
/// (any `EnvFilter` directive, e.g. `nxc_client=debug,info`).
///
/// ## Errors
/// Returns `CoreError::ConfigError` if the level is not a valid filter
/// directive or a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> CoreResult<()> {
    let filter = EnvFilter::try_new(config.level.as_str()).map_err(|e| {
        CoreError::ConfigError(format!("invalid log level {:?}: {e}", config.level))
    })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| CoreError::ConfigError(format!("tracing already initialised: {e}")))?;

    tracing::debug!(level = %config.level, "Tracing initialised");
    Ok(())
}
