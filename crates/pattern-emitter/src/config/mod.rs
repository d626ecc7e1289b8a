//! Emitter configuration
//!
//! Configuration controls cost, never results: turning the match cache or the
//! exact-only fast path off yields the same listeners in the same order.
//!
//! Configuration files are YAML (or JSON) with an `emitter` section:
//!
//! ```yaml
//! emitter:
//!   match_cache: true
//!   match_cache_capacity: 4096
//!   fast_path: true
//!   max_listeners: 10
//! ```

pub mod loader;
pub mod validator;

pub use loader::ConfigLoader;
pub use validator::ConfigValidator;

use serde::{Deserialize, Serialize};

/// Default number of identifiers the match cache holds before it is cleared
pub const DEFAULT_MATCH_CACHE_CAPACITY: usize = 4096;

/// Default per-key listener count above which a leak warning is logged
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Tunables for a [`PatternEmitter`](crate::PatternEmitter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitterConfig {
    /// Memoize match sets per identifier between registry mutations
    pub match_cache: bool,

    /// Distinct identifiers cached before the cache is cleared (0 is unbounded)
    pub match_cache_capacity: usize,

    /// Skip matching entirely while no pattern is registered
    pub fast_path: bool,

    /// Warn once per key when its bucket grows past this size (0 disables)
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            match_cache: true,
            match_cache_capacity: DEFAULT_MATCH_CACHE_CAPACITY,
            fast_path: true,
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl EmitterConfig {
    /// Configuration with caching and the fast path disabled
    ///
    /// Every emission computes its match set from scratch.
    pub fn uncached() -> Self {
        Self {
            match_cache: false,
            fast_path: false,
            ..Self::default()
        }
    }
}
