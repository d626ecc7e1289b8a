//! Shared registration ordering
//!
//! Every registration takes the next number from a [`SequenceSource`]. All
//! emitters built from the same source draw from one counter, so listeners
//! registered on different emitters, or under exact and pattern keys, still
//! have a single total order.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, OnceLock,
};

use crate::types::ListenerId;

static GLOBAL: OnceLock<SequenceSource> = OnceLock::new();

/// Monotonic source of registration sequence numbers
#[derive(Debug, Clone)]
pub struct SequenceSource {
    next: Arc<AtomicU64>,
}

impl SequenceSource {
    /// Create an independent source starting at 1
    pub fn new() -> Self {
        Self {
            next: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Process-wide source shared by emitters built with `PatternEmitter::new`
    pub fn global() -> Self {
        GLOBAL.get_or_init(SequenceSource::new).clone()
    }

    /// Take the next sequence number
    pub fn next_id(&self) -> ListenerId {
        ListenerId::from_raw(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number the next call to `next_id` will hand out
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }

    /// Whether both handles draw from the same counter
    pub fn shares_counter_with(&self, other: &SequenceSource) -> bool {
        Arc::ptr_eq(&self.next, &other.next)
    }
}

impl Default for SequenceSource {
    fn default() -> Self {
        Self::new()
    }
}
