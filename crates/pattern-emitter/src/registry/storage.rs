//! In-memory bucket storage

use std::collections::HashMap;

use super::{BucketKey, Record};
use crate::{
    error::{EmitterError, Result},
    pattern::Pattern,
    types::{EventId, Key, Listener, ListenerId},
};

/// Exact and pattern buckets for one emitter
pub struct Registry<A> {
    exact: HashMap<EventId, Vec<Record<A>>>,
    patterns: HashMap<String, Vec<Record<A>>>,
    pattern_objects: HashMap<String, Pattern>,
}

impl<A> Registry<A> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            patterns: HashMap::new(),
            pattern_objects: HashMap::new(),
        }
    }

    /// Append a record to the bucket for `key`
    ///
    /// `id` must be larger than every id already stored; callers draw it from
    /// a [`SequenceSource`](crate::SequenceSource) while holding exclusive
    /// access. Duplicate `(key, listener)` pairs are accepted.
    ///
    /// Returns the bucket the record went into and its new length.
    pub fn insert(
        &mut self,
        key: Key,
        id: ListenerId,
        listener: Listener<A>,
        once: bool,
    ) -> (BucketKey, usize) {
        match key {
            Key::Event(event) => {
                let bucket = BucketKey::Exact(event.clone());
                let records = self.exact.entry(event).or_default();
                records.push(Record {
                    id,
                    bucket: bucket.clone(),
                    listener,
                    once,
                });
                (bucket, records.len())
            }
            Key::Pattern(pattern) => {
                let canonical = pattern.canonical().to_string();
                let bucket = BucketKey::Pattern(canonical.clone());
                self.pattern_objects
                    .entry(canonical.clone())
                    .or_insert(pattern);
                let records = self.patterns.entry(canonical).or_default();
                records.push(Record {
                    id,
                    bucket: bucket.clone(),
                    listener,
                    once,
                });
                (bucket, records.len())
            }
        }
    }

    /// Remove one registration of `listener` under `key`
    ///
    /// Only a single record is removed per call: the most recently added one
    /// whose listener is the same handle. Returns its id, or `None` if the
    /// key or listener is unknown.
    pub fn remove_listener(&mut self, key: &Key, listener: &Listener<A>) -> Option<ListenerId> {
        let bucket = bucket_key(key);
        let records = self.records_mut(&bucket)?;
        let index = records.iter().rposition(|r| r.listener.same(listener))?;
        let removed = records.remove(index);
        self.prune(&bucket);
        Some(removed.id)
    }

    /// Remove the record `id` from `bucket`
    ///
    /// Returns `false` if the record is no longer there.
    pub fn remove_id(&mut self, bucket: &BucketKey, id: ListenerId) -> bool {
        let Some(records) = self.records_mut(bucket) else {
            return false;
        };
        // Buckets are sorted by id.
        let Ok(index) = records.binary_search_by_key(&id, |r| r.id) else {
            return false;
        };
        records.remove(index);
        self.prune(bucket);
        true
    }

    /// Remove the record `id` wherever it lives
    pub fn remove_id_anywhere(&mut self, id: ListenerId) -> bool {
        let bucket = self
            .exact
            .values()
            .chain(self.patterns.values())
            .flatten()
            .find(|r| r.id == id)
            .map(|r| r.bucket.clone());

        match bucket {
            Some(bucket) => self.remove_id(&bucket, id),
            None => false,
        }
    }

    /// Drop the bucket for `key`, returning how many records it held
    pub fn clear_key(&mut self, key: &Key) -> usize {
        match bucket_key(key) {
            BucketKey::Exact(event) => self.exact.remove(&event).map_or(0, |r| r.len()),
            BucketKey::Pattern(canonical) => {
                self.pattern_objects.remove(&canonical);
                self.patterns.remove(&canonical).map_or(0, |r| r.len())
            }
        }
    }

    /// Drop every bucket, returning how many records were held
    pub fn clear(&mut self) -> usize {
        let count = self.len();
        self.exact.clear();
        self.patterns.clear();
        self.pattern_objects.clear();
        count
    }

    /// Records in the exact bucket for `event`
    pub fn exact_bucket(&self, event: &EventId) -> &[Record<A>] {
        self.exact.get(event).map_or(&[][..], Vec::as_slice)
    }

    /// Records in the bucket for `key`, with no cross-type matches
    pub fn bucket(&self, key: &Key) -> &[Record<A>] {
        match key {
            Key::Event(event) => self.exact_bucket(event),
            Key::Pattern(pattern) => self
                .patterns
                .get(pattern.canonical())
                .map_or(&[][..], Vec::as_slice),
        }
    }

    /// Records in a pattern bucket
    ///
    /// # Errors
    ///
    /// Returns [`EmitterError::NotAPattern`] if `key` is an exact key.
    pub fn pattern_bucket(&self, key: &Key) -> Result<&[Record<A>]> {
        match key {
            Key::Event(event) => Err(EmitterError::NotAPattern(event.to_string())),
            Key::Pattern(_) => Ok(self.bucket(key)),
        }
    }

    /// Live patterns with their records
    pub fn patterns(&self) -> impl Iterator<Item = (&Pattern, &[Record<A>])> {
        self.patterns.iter().filter_map(|(canonical, records)| {
            self.pattern_objects
                .get(canonical)
                .map(|pattern| (pattern, records.as_slice()))
        })
    }

    /// Whether any pattern bucket exists
    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Exact keys with at least one listener
    pub fn event_ids(&self) -> Vec<EventId> {
        self.exact.keys().cloned().collect()
    }

    /// Canonical keys of patterns with at least one listener
    pub fn pattern_keys(&self) -> Vec<String> {
        self.patterns.keys().cloned().collect()
    }

    /// Every bucket, exact and pattern, as listener lists
    pub fn all(&self) -> HashMap<Key, Vec<Listener<A>>> {
        let exact = self
            .exact
            .iter()
            .map(|(event, records)| (Key::Event(event.clone()), records.as_slice()));
        let patterns = self.patterns().map(|(pattern, records)| {
            (Key::Pattern(pattern.clone()), records)
        });

        exact
            .chain(patterns)
            .map(|(key, records)| (key, listeners_of(records)))
            .collect()
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.exact.values().map(Vec::len).sum::<usize>()
            + self.patterns.values().map(Vec::len).sum::<usize>()
    }

    /// Whether no records are held
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }

    fn records_mut(&mut self, bucket: &BucketKey) -> Option<&mut Vec<Record<A>>> {
        match bucket {
            BucketKey::Exact(event) => self.exact.get_mut(event),
            BucketKey::Pattern(canonical) => self.patterns.get_mut(canonical),
        }
    }

    fn prune(&mut self, bucket: &BucketKey) {
        match bucket {
            BucketKey::Exact(event) => {
                if self.exact.get(event).is_some_and(Vec::is_empty) {
                    self.exact.remove(event);
                }
            }
            BucketKey::Pattern(canonical) => {
                if self.patterns.get(canonical).is_some_and(Vec::is_empty) {
                    self.patterns.remove(canonical);
                    self.pattern_objects.remove(canonical);
                }
            }
        }
    }
}

impl<A> Default for Registry<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket a key maps to
pub fn bucket_key(key: &Key) -> BucketKey {
    match key {
        Key::Event(event) => BucketKey::Exact(event.clone()),
        Key::Pattern(pattern) => BucketKey::Pattern(pattern.canonical().to_string()),
    }
}

/// Listener handles of `records`, in order
pub fn listeners_of<A>(records: &[Record<A>]) -> Vec<Listener<A>> {
    records.iter().map(|r| r.listener.clone()).collect()
}
