//! Configuration for the spatial cache.
//!
//! [`SpatialCacheConfig`] holds the construction parameters of a cache.
//! It can be built in code or loaded from the `[spatial_cache]` section of
//! an INI file:
//!
//! ```ini
//! [spatial_cache]
//! zoom = 16
//! max_tiles = 128
//! ```
//!
//! # Example
//!
//! ```
//! use geocache::config::SpatialCacheConfig;
//!
//! let config = SpatialCacheConfig::default().with_max_tiles(64);
//! assert_eq!(config.zoom, 16);
//! assert!(config.validate().is_ok());
//! ```

mod file;

pub use file::{config_file_path, load_from, parse_ini, ConfigFileError};

use crate::coord::MAX_ZOOM;

/// Default tile zoom level. A zoom 16 tile is roughly 600 m across.
pub const DEFAULT_ZOOM: u8 = 16;

/// Default maximum number of cached tiles.
pub const DEFAULT_MAX_TILES: usize = 128;

/// Construction parameters of a spatial cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialCacheConfig {
    /// Tile zoom level, fixed for the cache's lifetime
    pub zoom: u8,
    /// Maximum number of cached tiles (at least 1)
    pub max_tiles: usize,
}

impl Default for SpatialCacheConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            max_tiles: DEFAULT_MAX_TILES,
        }
    }
}

impl SpatialCacheConfig {
    /// Create a configuration with the given zoom and capacity.
    pub fn new(zoom: u8, max_tiles: usize) -> Self {
        Self { zoom, max_tiles }
    }

    /// Set the tile zoom level.
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the maximum number of cached tiles.
    pub fn with_max_tiles(mut self, max_tiles: usize) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    /// Check the configuration, describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.zoom > MAX_ZOOM {
            return Err(format!(
                "zoom {} exceeds maximum {}",
                self.zoom, MAX_ZOOM
            ));
        }
        if self.max_tiles < 1 {
            return Err("max_tiles must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpatialCacheConfig::default();
        assert_eq!(config.zoom, DEFAULT_ZOOM);
        assert_eq!(config.max_tiles, DEFAULT_MAX_TILES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SpatialCacheConfig::default().with_zoom(14).with_max_tiles(8);
        assert_eq!(config, SpatialCacheConfig::new(14, 8));
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let err = SpatialCacheConfig::new(16, 0).validate().unwrap_err();
        assert!(err.contains("max_tiles"));
    }

    #[test]
    fn test_zoom_too_high_is_invalid() {
        let err = SpatialCacheConfig::new(MAX_ZOOM + 1, 4).validate().unwrap_err();
        assert!(err.contains("zoom"));
    }
}
