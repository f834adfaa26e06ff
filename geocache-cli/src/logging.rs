//! Console logging for the CLI.
//!
//! Log lines go to stderr so command output on stdout stays clean.
//! The filter defaults to `info`, honours `RUST_LOG`, and `--verbose`
//! forces `debug`.

use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Install the global tracing subscriber.
pub fn init_logging(verbose: bool) -> Result<(), CliError> {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
