//! Spatial cache statistics.

/// Counters describing cache activity since construction (or last `clear`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Point lookups that found an entity
    pub key_hits: u64,
    /// Point lookups that found nothing
    pub key_misses: u64,
    /// Bounding box queries answered
    pub bbox_queries: u64,
    /// Calls made to the backing collaborator
    pub fetches: u64,
    /// Backing calls that returned an error
    pub fetch_failures: u64,
    /// Entities received from the backing collaborator
    pub fetched_entities: u64,
    /// Tiles dropped to stay within capacity
    pub evicted_tiles: u64,
    /// Entities dropped together with their evicted tiles
    pub evicted_entities: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of point lookups that hit (0.0 to 1.0).
    pub fn key_hit_rate(&self) -> f64 {
        let total = self.key_hits + self.key_misses;
        if total == 0 {
            0.0
        } else {
            self.key_hits as f64 / total as f64
        }
    }

    pub(crate) fn record_key_lookup(&mut self, hit: bool) {
        if hit {
            self.key_hits += 1;
        } else {
            self.key_misses += 1;
        }
    }

    pub(crate) fn record_fetch(&mut self, entities: usize) {
        self.fetches += 1;
        self.fetched_entities += entities as u64;
    }

    pub(crate) fn record_fetch_failure(&mut self) {
        self.fetches += 1;
        self.fetch_failures += 1;
    }

    pub(crate) fn record_eviction(&mut self, tiles: usize, entities: usize) {
        self.evicted_tiles += tiles as u64;
        self.evicted_entities += entities as u64;
    }
}
