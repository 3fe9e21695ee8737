//! Logging configuration
//!
//! Diagnostics are written to stderr so stdout stays reserved for
//! progress lines and step outputs.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::DeployError;

/// Initialize logging; the debug flag lowers the default filter level
pub fn init_logging(debug: bool) -> Result<(), DeployError> {
    let default_filter = if debug { "shunter=debug" } else { "shunter=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| DeployError::Internal(e.to_string()))?;

    Ok(())
}
