//! CLI command implementations.
//!
//! - [`tile`] - Position to tile conversion
//! - [`query`] - Bounding box queries through a spatial cache

pub mod points;
pub mod query;
pub mod tile;
