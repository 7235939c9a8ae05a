use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

use crate::CliError;
use crate::settings::{LogFormat, LogSettings};

pub const LOG_ENV: &str = "MODELCHECK_LOG";

/// Install the global subscriber. Logs go to stderr; stdout carries results.
pub fn init_logging(settings: &LogSettings) -> Result<(), CliError> {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| settings.level.clone());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|err| CliError::Logging(format!("invalid filter '{directive}': {err}")))?;

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339());

    let installed = match settings.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init(),
    };
    installed.map_err(|err| CliError::Logging(err.to_string()))
}
