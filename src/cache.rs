//! LRU cache of synthesized fields.
//!
//! Fields are keyed by [`Configuration::content_hash`], so any change to the
//! background, density, regions or metadata yields a fresh synthesis instead
//! of a stale field.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::config::Configuration;
use crate::error::Result;
use crate::field::ResolutionField;
use crate::synth::synthesize;

/// Default number of fields kept in memory
pub const DEFAULT_FIELD_CACHE_SIZE: usize = 4;

/// Cache statistics for monitoring
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of evictions
    pub evictions: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    /// Format as human-readable string
    pub fn summary(&self) -> String {
        format!(
            "Hits: {} | Misses: {} | Rate: {:.1}% | Evictions: {}",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.evictions
        )
    }
}

/// Synthesized fields by configuration content hash.
pub struct FieldCache {
    fields: HashMap<u64, Arc<ResolutionField>>,
    /// LRU order (most recent at back)
    lru_order: VecDeque<u64>,
    max_size: usize,
    stats: CacheStats,
}

impl FieldCache {
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            fields: HashMap::with_capacity(max_size),
            lru_order: VecDeque::with_capacity(max_size),
            max_size,
            stats: CacheStats::default(),
        }
    }

    /// Return the cached field for `config`, synthesizing it on a miss.
    pub fn get_or_synthesize(&mut self, config: &Configuration) -> Result<Arc<ResolutionField>> {
        let key = config.content_hash();

        if let Some(field) = self.fields.get(&key).cloned() {
            self.stats.hits += 1;
            self.touch(key);
            log::debug!("field cache hit for {:016x}", key);
            return Ok(field);
        }

        self.stats.misses += 1;
        let field = Arc::new(synthesize(config)?);
        self.insert(key, Arc::clone(&field));
        Ok(field)
    }

    pub fn contains(&self, config: &Configuration) -> bool {
        self.fields.contains_key(&config.content_hash())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.lru_order.clear();
    }

    fn touch(&mut self, key: u64) {
        self.lru_order.retain(|k| *k != key);
        self.lru_order.push_back(key);
    }

    fn insert(&mut self, key: u64, field: Arc<ResolutionField>) {
        if self.fields.len() >= self.max_size && !self.fields.contains_key(&key) {
            if let Some(old_key) = self.lru_order.pop_front() {
                self.fields.remove(&old_key);
                self.stats.evictions += 1;
            }
        }
        self.touch(key);
        self.fields.insert(key, field);
    }
}

impl Default for FieldCache {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_CACHE_SIZE)
    }
}
