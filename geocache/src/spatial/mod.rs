//! Tile-indexed, capacity-bounded cache of geographic entities.
//!
//! The [`SpatialCache`] sits in front of a slow backing collaborator (a
//! [`Fetcher`]) and answers point lookups by key and region queries by
//! bounding box. Regions are tracked as tiles of a fixed zoom level:
//!
//! ```text
//! get_in_bbox(bbox)
//! ├── enclosing tile rect of bbox
//! ├── missing sub-rect (bounding rect of uncached tiles)
//! ├── one fetch for the bounds of that sub-rect
//! ├── file entities under their own tiles, mark tiles cached
//! ├── refresh recency of every queried tile
//! └── evict least recently used tiles over capacity
//! ```
//!
//! # Thread Safety
//!
//! Tile index, entity store, recency and statistics live behind one mutex.
//! The backing fetch runs outside that lock but under a separate fetch gate,
//! so overlapping queries trigger a single fetch and no caller sees a
//! half-applied result.
//!
//! # Example
//!
//! ```
//! use geocache::config::SpatialCacheConfig;
//! use geocache::coord::{tile_bounds, tile_of, LatLon};
//! use geocache::spatial::{NoOpFetcher, SpatialCache};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Node {
//!     id: u64,
//!     position: LatLon,
//! }
//!
//! let cache = SpatialCache::new(
//!     SpatialCacheConfig::new(16, 4),
//!     NoOpFetcher,
//!     |n: &Node| n.id,
//!     |n: &Node| n.position,
//! )
//! .unwrap();
//!
//! let node = Node { id: 1, position: LatLon::new(1.0, 1.0) };
//! let tile = tile_of(node.position, 16);
//!
//! // Updates to never-fetched tiles are dropped
//! cache.update(vec![node.clone()], vec![]);
//! assert_eq!(cache.get(&1), None);
//!
//! // Once the tile is cached, updates are kept
//! cache.get_in_bbox(&tile_bounds(tile, 16)).unwrap();
//! cache.update(vec![node.clone()], vec![]);
//! assert_eq!(cache.get(&1), Some(node));
//! ```

mod fetch;
mod recency;
mod stats;
mod store;
mod tile_index;
mod types;

pub use fetch::{FetchError, Fetcher, NoOpFetcher};
pub use stats::CacheStats;
pub use store::EntityStore;
pub use tile_index::TileIndex;
pub use types::SpatialCacheError;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use parking_lot::Mutex;

use crate::config::SpatialCacheConfig;
use crate::coord::{
    covering_tile_rects, rect_bounds, tile_of, BoundingBox, LatLon, TilePos, TileRect,
};

type KeyFn<K, T> = Box<dyn Fn(&T) -> K + Send + Sync>;
type PositionFn<T> = Box<dyn Fn(&T) -> LatLon + Send + Sync>;

/// Everything guarded by the cache's single lock.
struct CacheState<K, T> {
    tiles: TileIndex<K>,
    entities: EntityStore<K, T>,
    stats: CacheStats,
    /// Bumped by every caller-driven write, so a fetch can tell whether the
    /// cache changed while it ran.
    writes: u64,
}

/// How a batch of entities is applied to a tile region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Apply {
    /// Bulk replacement: every tile of the region takes the given content.
    Replace,
    /// Fetch result: only tiles still uncached take the given content.
    Fill { concurrent_writes: bool },
}

/// Bounding rectangles of the uncached tiles of each rect.
fn missing_rects<K: Eq + Hash + Clone>(tiles: &TileIndex<K>, rects: &[TileRect]) -> Vec<TileRect> {
    rects
        .iter()
        .filter_map(|rect| tiles.missing_sub_rect(*rect))
        .collect()
}

/// One box covering `rects`, which are ordered west to east across the
/// antimeridian as [`covering_tile_rects`] returns them.
///
/// Returns `None` for no rects.
fn fetch_bounds(rects: &[TileRect], zoom: u8) -> Option<BoundingBox> {
    let west_edge = rect_bounds(*rects.first()?, zoom).min.longitude;
    let east_edge = rect_bounds(*rects.last()?, zoom).max.longitude;

    let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
    for rect in rects {
        let bounds = rect_bounds(*rect, zoom);
        min_lat = min_lat.min(bounds.min.latitude);
        max_lat = max_lat.max(bounds.max.latitude);
    }
    Some(BoundingBox::new(min_lat, west_edge, max_lat, east_edge))
}

/// Spatially indexed, capacity-bounded entity cache.
///
/// `K` is the entity key, `T` the entity. Keys and positions are obtained
/// through the extractor functions given at construction, so any value type
/// qualifies.
pub struct SpatialCache<K, T> {
    config: SpatialCacheConfig,
    fetcher: Box<dyn Fetcher<T>>,
    key_of: KeyFn<K, T>,
    position_of: PositionFn<T>,
    state: Mutex<CacheState<K, T>>,
    /// Serializes backing fetches so overlapping gaps are fetched once.
    fetch_gate: Mutex<()>,
}

impl<K, T> SpatialCache<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    /// Create an empty cache.
    ///
    /// # Arguments
    ///
    /// * `config` - Zoom level and tile capacity
    /// * `fetcher` - Backing collaborator consulted for uncached regions
    /// * `key_of` - Extracts an entity's stable key
    /// * `position_of` - Extracts an entity's position
    ///
    /// # Errors
    ///
    /// Returns [`SpatialCacheError::InvalidConfig`] if the capacity is zero
    /// or the zoom level is out of range.
    pub fn new<F, KF, PF>(
        config: SpatialCacheConfig,
        fetcher: F,
        key_of: KF,
        position_of: PF,
    ) -> Result<Self, SpatialCacheError>
    where
        F: Fetcher<T> + 'static,
        KF: Fn(&T) -> K + Send + Sync + 'static,
        PF: Fn(&T) -> LatLon + Send + Sync + 'static,
    {
        config.validate().map_err(SpatialCacheError::InvalidConfig)?;

        tracing::debug!(
            zoom = config.zoom,
            max_tiles = config.max_tiles,
            "Spatial cache created"
        );

        Ok(Self {
            config,
            fetcher: Box::new(fetcher),
            key_of: Box::new(key_of),
            position_of: Box::new(position_of),
            state: Mutex::new(CacheState {
                tiles: TileIndex::new(),
                entities: EntityStore::new(),
                stats: CacheStats::new(),
                writes: 0,
            }),
            fetch_gate: Mutex::new(()),
        })
    }

    /// Seed the cache with entities known to be complete for `bbox`.
    ///
    /// Equivalent to calling [`replace_all_in_bbox`](Self::replace_all_in_bbox)
    /// on the new cache.
    pub fn with_initial(self, entities: Vec<T>, bbox: &BoundingBox) -> Self {
        self.replace_all_in_bbox(entities, bbox);
        self
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &SpatialCacheConfig {
        &self.config
    }

    /// Look up an entity by key.
    ///
    /// Never consults the backing collaborator. Returns `None` if the
    /// entity's tile was never cached, was evicted, or the entity was deleted
    /// or moved to an uncached tile.
    pub fn get(&self, key: &K) -> Option<T> {
        let mut state = self.state.lock();
        let found = state.entities.get(key).cloned();
        state.stats.record_key_lookup(found.is_some());
        found
    }

    /// Return every entity whose position lies inside `bbox`.
    ///
    /// Tiles covering `bbox` that aren't cached are fetched from the backing
    /// collaborator in a single call covering the bounding rectangle of the
    /// gaps. A box crossing the antimeridian is covered by the tiles on
    /// either side of the seam, and its gaps are fetched with one box that
    /// crosses the seam as well.
    ///
    /// Fetched entities only fill tiles that are still uncached when the
    /// result arrives. Tiles written by [`update`](Self::update) or
    /// [`replace_all_in_bbox`](Self::replace_all_in_bbox) in the meantime keep
    /// their newer content.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialCacheError::Fetch`] if the backing collaborator
    /// fails. The cache is left exactly as it was before the call.
    pub fn get_in_bbox(&self, bbox: &BoundingBox) -> Result<Vec<T>, SpatialCacheError> {
        let rects = covering_tile_rects(bbox, self.config.zoom);

        {
            let mut state = self.state.lock();
            if missing_rects(&state.tiles, &rects).is_empty() {
                tracing::trace!(%bbox, "Spatial cache hit");
                return Ok(self.collect_and_trim(&mut state, &rects, bbox));
            }
        }

        let _gate = self.fetch_gate.lock();

        // Another caller may have filled the gap while we waited.
        let (missing, writes_before) = {
            let state = self.state.lock();
            (missing_rects(&state.tiles, &rects), state.writes)
        };

        let fetched = match fetch_bounds(&missing, self.config.zoom) {
            Some(fetch_bbox) => {
                tracing::debug!(%bbox, %fetch_bbox, rects = missing.len(), "Fetching missing tiles");

                match self.fetcher.fetch(&fetch_bbox) {
                    Ok(entities) => Some(entities),
                    Err(source) => {
                        tracing::warn!(%fetch_bbox, error = %source, "Spatial cache fetch failed");
                        self.state.lock().stats.record_fetch_failure();
                        return Err(SpatialCacheError::Fetch {
                            bbox: fetch_bbox,
                            source,
                        });
                    }
                }
            }
            None => None,
        };

        let mut state = self.state.lock();
        if let Some(entities) = fetched {
            state.stats.record_fetch(entities.len());
            let concurrent_writes = state.writes != writes_before;
            tracing::debug!(
                entities = entities.len(),
                concurrent_writes,
                "Applying fetched entities"
            );
            self.apply_region(
                &mut state,
                &missing,
                entities,
                Apply::Fill { concurrent_writes },
            );
        }
        Ok(self.collect_and_trim(&mut state, &rects, bbox))
    }

    /// Apply incremental changes.
    ///
    /// Deleted keys are removed first (absent keys are ignored). Each updated
    /// or added entity is then filed under the tile of its current position
    /// if that tile is cached; otherwise it is dropped from the cache
    /// entirely.
    pub fn update(&self, updated_or_added: Vec<T>, deleted: Vec<K>) {
        let mut state = self.state.lock();
        state.writes += 1;

        for key in &deleted {
            if let Some((_, tile)) = state.entities.remove(key) {
                state.tiles.remove_key(tile, key);
            }
        }

        let mut kept = 0_usize;
        let total = updated_or_added.len();
        for entity in updated_or_added {
            if self.place(&mut state, entity) {
                kept += 1;
            }
        }

        tracing::trace!(
            deleted = deleted.len(),
            updated = kept,
            dropped = total - kept,
            "Spatial cache updated"
        );
    }

    /// Replace all cached content of the tiles covering `bbox`.
    ///
    /// The bounding box is rounded up to the tiles it touches. Those tiles
    /// become cached with exactly the given entities whose own tile lies
    /// among them; entities positioned elsewhere are ignored, and previously
    /// cached entities of those tiles not given again are removed.
    pub fn replace_all_in_bbox(&self, entities: Vec<T>, bbox: &BoundingBox) {
        let rects = covering_tile_rects(bbox, self.config.zoom);
        let mut state = self.state.lock();
        state.writes += 1;

        self.apply_region(&mut state, &rects, entities, Apply::Replace);
        self.enforce_capacity(&mut state);
    }

    /// Snapshot of all cached tiles.
    pub fn get_tiles(&self) -> HashSet<TilePos> {
        self.state.lock().tiles.tiles()
    }

    /// Snapshot of all cached entity keys.
    pub fn get_keys(&self) -> HashSet<K> {
        self.state.lock().entities.keys().cloned().collect()
    }

    /// Number of cached tiles.
    pub fn tile_count(&self) -> usize {
        self.state.lock().tiles.len()
    }

    /// Number of cached entities.
    pub fn entity_count(&self) -> usize {
        self.state.lock().entities.len()
    }

    /// Copy of the activity counters.
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Drop every tile and entity and reset statistics.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.tiles.clear();
        state.entities.clear();
        state.stats = CacheStats::new();
        state.writes += 1;
        tracing::debug!("Spatial cache cleared");
    }

    /// File an entity under the tile of its position, if that tile is cached.
    ///
    /// Returns whether the entity is in the cache afterwards.
    fn place(&self, state: &mut CacheState<K, T>, entity: T) -> bool {
        let key = (self.key_of)(&entity);
        let tile = tile_of((self.position_of)(&entity), self.config.zoom);

        if let Some(old_tile) = state.entities.tile_of(&key) {
            if old_tile != tile {
                state.tiles.remove_key(old_tile, &key);
            }
        }

        if state.tiles.add_key(tile, key.clone()) {
            state.tiles.record_access(tile);
            state.entities.put(key, entity, tile);
            true
        } else {
            state.entities.remove(&key);
            false
        }
    }

    /// Give the tiles of `rects` exactly the entities of `entities` filed
    /// under them.
    ///
    /// Only the last occurrence of a key in `entities` counts. With
    /// [`Apply::Replace`] every tile of `rects` is overwritten and entities
    /// elsewhere are ignored. With [`Apply::Fill`] only tiles still uncached
    /// are written, and entities elsewhere are placed with update semantics.
    fn apply_region(
        &self,
        state: &mut CacheState<K, T>,
        rects: &[TileRect],
        entities: Vec<T>,
        mode: Apply,
    ) {
        let mut latest: HashMap<K, T> = HashMap::with_capacity(entities.len());
        for entity in entities {
            latest.insert((self.key_of)(&entity), entity);
        }

        let targets: Vec<TilePos> = rects
            .iter()
            .flat_map(|rect| rect.tiles())
            .filter(|tile| mode == Apply::Replace || !state.tiles.is_cached(*tile))
            .collect();
        let target_set: HashSet<TilePos> = targets.iter().copied().collect();
        let concurrent_writes = matches!(mode, Apply::Fill { concurrent_writes: true });

        let mut inside = Vec::new();
        let mut outside = Vec::new();
        for (key, entity) in latest {
            let tile = tile_of((self.position_of)(&entity), self.config.zoom);
            if target_set.contains(&tile) {
                inside.push((key, tile, entity));
            } else if !concurrent_writes
                && mode != Apply::Replace
                && !rects.iter().any(|rect| rect.contains(tile))
            {
                outside.push(entity);
            }
        }

        let mut keys_by_tile: HashMap<TilePos, HashSet<K>> = HashMap::new();
        let mut filed = Vec::with_capacity(inside.len());
        for (key, tile, entity) in inside {
            if let Some(old_tile) = state.entities.tile_of(&key) {
                if !target_set.contains(&old_tile) {
                    // A newer write may have placed it there during the fetch.
                    if concurrent_writes {
                        continue;
                    }
                    state.tiles.remove_key(old_tile, &key);
                }
            }
            keys_by_tile.entry(tile).or_default().insert(key.clone());
            filed.push((key, tile, entity));
        }

        for key in state.tiles.mark_fetched(targets, keys_by_tile) {
            state.entities.remove(&key);
        }
        for (key, tile, entity) in filed {
            state.entities.put(key, entity, tile);
        }
        for entity in outside {
            self.place(state, entity);
        }
    }

    /// Refresh recency of every tile in `rects`, gather the entities inside
    /// `bbox`, then evict over capacity.
    ///
    /// The result is gathered before eviction so a query wider than the
    /// capacity still returns everything it covers.
    fn collect_and_trim(
        &self,
        state: &mut CacheState<K, T>,
        rects: &[TileRect],
        bbox: &BoundingBox,
    ) -> Vec<T> {
        let mut keys = Vec::new();
        for rect in rects {
            for tile in rect.tiles() {
                state.tiles.record_access(tile);
            }
            keys.extend(state.tiles.keys_in(*rect));
        }
        let found = state
            .entities
            .filter_in_bbox(&keys, bbox, |entity| (self.position_of)(entity));
        state.stats.bbox_queries += 1;

        self.enforce_capacity(state);
        found
    }

    fn enforce_capacity(&self, state: &mut CacheState<K, T>) {
        let (tiles, keys) = state.tiles.evict_if_over_capacity(self.config.max_tiles);
        if tiles.is_empty() {
            return;
        }
        for key in &keys {
            state.entities.remove(key);
        }
        state.stats.record_eviction(tiles.len(), keys.len());
        tracing::debug!(
            tiles = tiles.len(),
            entities = keys.len(),
            remaining = state.tiles.len(),
            "Evicted least recently used tiles"
        );
    }
}

impl<K, T> std::fmt::Debug for SpatialCache<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
