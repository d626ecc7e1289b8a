//! Match-set cache
//!
//! Memoizes the match set per identifier. Any registry mutation clears the
//! whole cache: deciding which cached identifiers a new or removed pattern
//! affects would mean re-testing every one of them anyway.
//!
//! Between mutations the cache grows by one entry per distinct identifier
//! emitted. A capacity bounds that: storing a new identifier into a full
//! cache clears it first, which is counted as an eviction.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{registry::Record, types::EventId};

/// Cache performance statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Emissions served from the cache
    pub hits: u64,
    /// Emissions that had to compute the match set
    pub misses: u64,
    /// Times a mutation cleared a non-empty cache
    pub invalidations: u64,
    /// Times a full cache was cleared to make room
    pub evictions: u64,
    /// Identifiers currently cached
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Identifier to match-set memo
pub struct MatchCache<A> {
    entries: HashMap<EventId, Arc<[Record<A>]>>,
    capacity: usize,
    hits: u64,
    misses: u64,
    invalidations: u64,
    evictions: u64,
}

impl<A> MatchCache<A> {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a cache holding at most `capacity` identifiers (0 is unbounded)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
            invalidations: 0,
            evictions: 0,
        }
    }

    /// Look up `event`, counting a hit or a miss
    pub fn lookup(&mut self, event: &EventId) -> Option<Arc<[Record<A>]>> {
        match self.entries.get(event) {
            Some(records) => {
                self.hits += 1;
                Some(Arc::clone(records))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Cached match set for `event`, without touching the counters
    pub fn peek(&self, event: &EventId) -> Option<Arc<[Record<A>]>> {
        self.entries.get(event).map(Arc::clone)
    }

    /// Store the match set for `event`
    pub fn store(&mut self, event: EventId, records: Arc<[Record<A>]>) {
        if self.capacity > 0
            && self.entries.len() >= self.capacity
            && !self.entries.contains_key(&event)
        {
            self.entries.clear();
            self.evictions += 1;
        }
        self.entries.insert(event, records);
    }

    /// Forget every cached match set
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.invalidations += 1;
        }
    }

    /// Current statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            invalidations: self.invalidations,
            evictions: self.evictions,
            entries: self.entries.len(),
        }
    }
}

impl<A> Default for MatchCache<A> {
    fn default() -> Self {
        Self::new()
    }
}
