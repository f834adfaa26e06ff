//! Configuration file handling for `~/.geocache/config.ini`.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::SpatialCacheConfig;

const SECTION: &str = "spatial_cache";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFileError {
    fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            section: SECTION.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Default configuration file location (`~/.geocache/config.ini`).
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".geocache")
        .join("config.ini")
}

/// Load configuration from a specific path.
///
/// If the file doesn't exist, returns defaults.
pub fn load_from(path: &Path) -> Result<SpatialCacheConfig, ConfigFileError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(SpatialCacheConfig::default());
    }

    let ini = Ini::load_from_file(path)?;
    let config = parse_ini(&ini)?;
    tracing::debug!(
        path = %path.display(),
        zoom = config.zoom,
        max_tiles = config.max_tiles,
        "Loaded spatial cache config"
    );
    Ok(config)
}

/// Parse an `Ini` object into a [`SpatialCacheConfig`].
///
/// Starts from the defaults and overlays any values found in the
/// `[spatial_cache]` section.
pub fn parse_ini(ini: &Ini) -> Result<SpatialCacheConfig, ConfigFileError> {
    let mut config = SpatialCacheConfig::default();

    if let Some(section) = ini.section(Some(SECTION)) {
        if let Some(v) = section.get("zoom") {
            config.zoom = v
                .trim()
                .parse()
                .map_err(|_| ConfigFileError::invalid("zoom", v, "must be an integer"))?;
        }
        if let Some(v) = section.get("max_tiles") {
            config.max_tiles = v
                .trim()
                .parse()
                .map_err(|_| ConfigFileError::invalid("max_tiles", v, "must be an integer"))?;
        }
    }

    config.validate().map_err(|reason| {
        let (key, value) = if reason.starts_with("zoom") {
            ("zoom", config.zoom.to_string())
        } else {
            ("max_tiles", config.max_tiles.to_string())
        };
        ConfigFileError::invalid(key, &value, reason)
    })?;

    Ok(config)
}
