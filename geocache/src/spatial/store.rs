//! Entity store: key → current entity value.

use std::collections::HashMap;
use std::hash::Hash;

use crate::coord::{BoundingBox, LatLon, TilePos};

#[derive(Debug, Clone)]
struct StoredEntity<T> {
    value: T,
    /// Tile the entity is filed under in the tile index.
    tile: TilePos,
}

/// Current value of every cached entity, keyed by identity.
///
/// Lookups never reach the backing collaborator.
#[derive(Debug)]
pub struct EntityStore<K, T> {
    entities: HashMap<K, StoredEntity<T>>,
}

impl<K, T> Default for EntityStore<K, T> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, T: Clone> EntityStore<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity, recording the tile it is filed under.
    pub fn put(&mut self, key: K, value: T, tile: TilePos) {
        self.entities.insert(key, StoredEntity { value, tile });
    }

    /// Remove an entity, returning its value and tile.
    pub fn remove(&mut self, key: &K) -> Option<(T, TilePos)> {
        self.entities
            .remove(key)
            .map(|stored| (stored.value, stored.tile))
    }

    pub fn get(&self, key: &K) -> Option<&T> {
        self.entities.get(key).map(|stored| &stored.value)
    }

    /// Tile an entity is currently filed under.
    pub fn tile_of(&self, key: &K) -> Option<TilePos> {
        self.entities.get(key).map(|stored| stored.tile)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entities.keys()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Among exactly `keys`, the entities whose position lies inside `bbox`.
    ///
    /// Keys not present in the store are skipped. Containment is geographic,
    /// not tile-aligned.
    pub fn filter_in_bbox<'a, I, P>(&self, keys: I, bbox: &BoundingBox, position_of: P) -> Vec<T>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
        P: Fn(&T) -> LatLon,
    {
        keys.into_iter()
            .filter_map(|key| self.entities.get(key))
            .filter(|stored| bbox.contains(position_of(&stored.value)))
            .map(|stored| stored.value.clone())
            .collect()
    }
}
