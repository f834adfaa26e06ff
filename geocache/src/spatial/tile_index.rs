//! Tile index: which tiles are cached, what each contains, and recency.
//!
//! A tile present in the index is authoritative: its coverage has been
//! fetched (or bulk-replaced) and its key set is complete, even when empty.
//! A tile absent from the index has never been fetched or has been evicted.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::recency::{Handle, RecencyList};
use crate::coord::{min_tile_rect, TilePos, TileRect};

#[derive(Debug)]
struct TileEntry<K> {
    keys: HashSet<K>,
    handle: Handle,
}

/// Map from cached tile to the keys filed under it, with LRU ordering.
#[derive(Debug)]
pub struct TileIndex<K> {
    tiles: HashMap<TilePos, TileEntry<K>>,
    recency: RecencyList,
}

impl<K> Default for TileIndex<K> {
    fn default() -> Self {
        Self {
            tiles: HashMap::new(),
            recency: RecencyList::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> TileIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tile's coverage is cached.
    #[inline]
    pub fn is_cached(&self, tile: TilePos) -> bool {
        self.tiles.contains_key(&tile)
    }

    /// Number of cached tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Snapshot of all cached tiles.
    pub fn tiles(&self) -> HashSet<TilePos> {
        self.tiles.keys().copied().collect()
    }

    /// Cached tiles from least to most recently used.
    pub fn tiles_by_recency(&self) -> Vec<TilePos> {
        self.recency.iter().collect()
    }

    /// Keys filed under a tile, or `None` if the tile isn't cached.
    pub fn keys_of(&self, tile: TilePos) -> Option<&HashSet<K>> {
        self.tiles.get(&tile).map(|entry| &entry.keys)
    }

    /// All keys filed under cached tiles inside `rect`.
    pub fn keys_in(&self, rect: TileRect) -> Vec<K> {
        rect.tiles()
            .filter_map(|tile| self.tiles.get(&tile))
            .flat_map(|entry| entry.keys.iter().cloned())
            .collect()
    }

    /// Bounding rectangle of all tiles in `rect` that are not cached.
    ///
    /// Returns `None` when every tile of `rect` is cached. The result may
    /// include cached tiles lying between uncached ones.
    pub fn missing_sub_rect(&self, rect: TileRect) -> Option<TileRect> {
        min_tile_rect(rect.tiles().filter(|tile| !self.is_cached(*tile)))
    }

    /// Mark the given tiles as cached with the given contents, in order.
    ///
    /// Accepts a whole [`TileRect`] or any other tile sequence. Tiles missing
    /// from `keys_by_tile` become cached-and-empty. Entries of
    /// `keys_by_tile` for other tiles are ignored. Every given tile becomes
    /// most recently used.
    ///
    /// Returns the keys previously filed under the given tiles.
    pub fn mark_fetched<I>(
        &mut self,
        tiles: I,
        mut keys_by_tile: HashMap<TilePos, HashSet<K>>,
    ) -> Vec<K>
    where
        I: IntoIterator<Item = TilePos>,
    {
        let mut displaced = Vec::new();

        for tile in tiles {
            let keys = keys_by_tile.remove(&tile).unwrap_or_default();
            match self.tiles.get_mut(&tile) {
                Some(entry) => {
                    displaced.extend(std::mem::replace(&mut entry.keys, keys));
                    self.recency.move_to_back(entry.handle);
                }
                None => {
                    let handle = self.recency.push_back(tile);
                    self.tiles.insert(tile, TileEntry { keys, handle });
                }
            }
        }

        displaced
    }

    /// Move a cached tile to the most recently used position.
    ///
    /// Does nothing if the tile isn't cached.
    pub fn record_access(&mut self, tile: TilePos) {
        if let Some(entry) = self.tiles.get(&tile) {
            self.recency.move_to_back(entry.handle);
        }
    }

    /// File `key` under a cached tile.
    ///
    /// Returns `false` (and does nothing) if the tile isn't cached.
    pub fn add_key(&mut self, tile: TilePos, key: K) -> bool {
        match self.tiles.get_mut(&tile) {
            Some(entry) => {
                entry.keys.insert(key);
                true
            }
            None => false,
        }
    }

    /// Remove `key` from a tile's key set.
    ///
    /// Returns whether the key was present.
    pub fn remove_key(&mut self, tile: TilePos, key: &K) -> bool {
        self.tiles
            .get_mut(&tile)
            .is_some_and(|entry| entry.keys.remove(key))
    }

    /// Evict least recently used tiles until at most `max_tiles` remain.
    ///
    /// Returns the evicted tiles and the keys that were filed under them.
    pub fn evict_if_over_capacity(&mut self, max_tiles: usize) -> (Vec<TilePos>, Vec<K>) {
        let mut evicted_tiles = Vec::new();
        let mut evicted_keys = Vec::new();

        while self.tiles.len() > max_tiles {
            let Some(tile) = self.recency.pop_front() else {
                break;
            };
            if let Some(entry) = self.tiles.remove(&tile) {
                evicted_keys.extend(entry.keys);
            }
            evicted_tiles.push(tile);
        }

        debug_assert_eq!(self.recency.len(), self.tiles.len());
        (evicted_tiles, evicted_keys)
    }

    /// Drop every tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.recency.clear();
    }
}
