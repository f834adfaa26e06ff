//! Backing collaborator contract.

use crate::coord::BoundingBox;

/// Error type returned by a [`Fetcher`].
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Source of authoritative entities for a region, consulted on cache misses.
///
/// Implementations must return every entity whose position lies inside
/// `bbox`. Returning a few entities outside the box is allowed; the cache
/// files each entity under its own tile and re-filters results exactly.
/// The box may cross the antimeridian (`min.longitude > max.longitude`);
/// use [`BoundingBox::contains`] to test positions against it.
///
/// Closures of the form `Fn(&BoundingBox) -> Result<Vec<T>, FetchError>`
/// implement this trait:
///
/// ```
/// use geocache::coord::BoundingBox;
/// use geocache::spatial::{FetchError, Fetcher};
///
/// let fetcher = |_bbox: &BoundingBox| -> Result<Vec<u32>, FetchError> { Ok(vec![]) };
/// assert!(fetcher.fetch(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap().is_empty());
/// ```
pub trait Fetcher<T>: Send + Sync {
    /// Fetch all entities inside `bbox`. Blocks until the data is available.
    fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<T>, FetchError>;
}

impl<T, F> Fetcher<T> for F
where
    F: Fn(&BoundingBox) -> Result<Vec<T>, FetchError> + Send + Sync,
{
    fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<T>, FetchError> {
        self(bbox)
    }
}

/// Fetcher that never finds anything.
///
/// Useful when the cache is populated only through
/// `replace_all_in_bbox` and `update`, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpFetcher;

impl<T> Fetcher<T> for NoOpFetcher {
    fn fetch(&self, _bbox: &BoundingBox) -> Result<Vec<T>, FetchError> {
        Ok(Vec::new())
    }
}
