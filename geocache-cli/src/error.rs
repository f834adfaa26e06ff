//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a non-zero exit code.

use std::fmt;
use std::path::PathBuf;
use std::process;

use geocache::config::ConfigFileError;
use geocache::SpatialCacheError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Command-line value out of range
    InvalidArgument(String),
    /// Failed to read the points file
    DataRead { path: PathBuf, error: std::io::Error },
    /// Malformed line in the points file
    DataParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Cache construction or query failed
    Cache(SpatialCacheError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::DataParse { .. } = self {
            eprintln!();
            eprintln!("Expected one point per line: id,lat,lon[,label]");
            eprintln!("Lines starting with '#' and blank lines are ignored.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::DataRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
            CliError::DataParse { path, line, reason } => {
                write!(f, "{}:{}: {}", path.display(), line, reason)
            }
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::DataRead { error, .. } => Some(error),
            CliError::Cache(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<SpatialCacheError> for CliError {
    fn from(e: SpatialCacheError) -> Self {
        CliError::Cache(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_parse_display_points_at_line() {
        let err = CliError::DataParse {
            path: PathBuf::from("points.csv"),
            line: 7,
            reason: "latitude out of range".to_string(),
        };
        assert_eq!(err.to_string(), "points.csv:7: latitude out of range");
    }

    #[test]
    fn test_cache_error_has_source() {
        use std::error::Error;

        let err = CliError::from(SpatialCacheError::InvalidConfig("max_tiles".into()));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Cache error"));
    }
}
