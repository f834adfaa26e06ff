//! Error types for the spatial cache.

use thiserror::Error;

use super::fetch::FetchError;
use crate::coord::BoundingBox;

/// Spatial cache errors.
#[derive(Debug, Error)]
pub enum SpatialCacheError {
    /// Invalid cache configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// The backing collaborator failed; the cache is unchanged
    #[error("Failed to fetch entities for {bbox}: {source}")]
    Fetch {
        bbox: BoundingBox,
        #[source]
        source: FetchError,
    },
}
