//! Listener registry
//!
//! The registry owns two families of buckets:
//!
//! * exact buckets, keyed by [`EventId`]
//! * pattern buckets, keyed by a pattern's canonical `/source/flags` string,
//!   with the live [`Pattern`](crate::Pattern) kept in a side table so
//!   identifiers can be tested against it
//!
//! Each bucket is an ordered list of [`Record`]s. Records are appended with a
//! fresh sequence number, so a bucket is always sorted by sequence. Buckets
//! never linger empty: removing the last record drops the bucket, and for
//! patterns the side-table entry with it.
//!
//! # Examples
//!
//! ```ignore
//! use pattern_emitter::registry::Registry;
//!
//! let mut registry: Registry<()> = Registry::new();
//! let sequence = SequenceSource::new();
//!
//! registry.insert(Key::from("save"), sequence.next_id(), listener.clone(), false);
//! registry.insert(Pattern::new("^sa")?.into(), sequence.next_id(), listener, false);
//!
//! assert_eq!(registry.exact_bucket(&"save".into()).len(), 1);
//! assert!(registry.has_patterns());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod storage;

pub use storage::Registry;

use std::fmt;

use crate::types::{EventId, Listener, ListenerId};

/// Identifies one bucket inside a [`Registry`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    /// Exact bucket
    Exact(EventId),

    /// Pattern bucket, by canonical form
    Pattern(String),
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Exact(id) => fmt::Display::fmt(id, f),
            BucketKey::Pattern(canonical) => f.write_str(canonical),
        }
    }
}

/// One registration
///
/// Records are created on registration and only ever deleted, never edited.
pub struct Record<A> {
    /// Global sequence number, doubling as the registration handle
    pub id: ListenerId,

    /// Bucket the record lives in
    pub bucket: BucketKey,

    /// Callable registered by the user
    pub listener: Listener<A>,

    /// Whether the record removes itself before its first invocation
    pub once: bool,
}

impl<A> Clone for Record<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            bucket: self.bucket.clone(),
            listener: self.listener.clone(),
            once: self.once,
        }
    }
}

impl<A> fmt::Debug for Record<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("bucket", &self.bucket)
            .field("once", &self.once)
            .finish()
    }
}
