//! Geocache - Spatially indexed cache of geographic entities
//!
//! This library keeps a bounded working set of geographic entities in memory,
//! indexed by Web Mercator tiles of a fixed zoom level, in front of a slower
//! authoritative source.
//!
//! # High-Level API
//!
//! The [`spatial`] module provides the cache itself:
//!
//! ```ignore
//! use geocache::config::SpatialCacheConfig;
//! use geocache::spatial::SpatialCache;
//!
//! let cache = SpatialCache::new(SpatialCacheConfig::default(), fetcher, key_of, position_of)?;
//! let nearby = cache.get_in_bbox(&bbox)?;
//! ```
//!
//! [`coord`] holds the tile arithmetic, [`config`] the tunables and their
//! INI file loader.

pub mod config;
pub mod coord;
pub mod spatial;

pub use config::SpatialCacheConfig;
pub use coord::{BoundingBox, LatLon, TilePos, TileRect};
pub use spatial::{CacheStats, FetchError, Fetcher, SpatialCache, SpatialCacheError};

/// Version of the geocache library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
