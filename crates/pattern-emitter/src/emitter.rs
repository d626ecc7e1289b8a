//! The emitter handle: registration, removal, and introspection
//!
//! Emission lives in [`dispatcher`](crate::dispatcher).

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    cache::{CacheStats, MatchCache},
    config::EmitterConfig,
    dispatcher::Resolve,
    error::Result,
    registry::{storage::listeners_of, BucketKey, Registry},
    sequence::SequenceSource,
    types::{EventId, Key, Listener, ListenerId},
};

pub(crate) struct EmitterState<A> {
    pub(crate) registry: Registry<A>,
    pub(crate) cache: MatchCache<A>,
    pub(crate) config: EmitterConfig,
    warned: HashSet<BucketKey>,
}

impl<A> EmitterState<A> {
    fn new(config: EmitterConfig) -> Self {
        Self {
            registry: Registry::new(),
            cache: MatchCache::with_capacity(config.match_cache_capacity),
            config,
            warned: HashSet::new(),
        }
    }

    fn check_max_listeners(&mut self, key: &Key, bucket: BucketKey, count: usize) {
        let max = self.config.max_listeners;
        if max > 0 && count > max && self.warned.insert(bucket) {
            warn!(
                key = %key,
                count = count,
                max_listeners = max,
                "Possible listener leak: key has more listeners than max_listeners"
            );
        }
    }
}

/// Pattern-aware publish/subscribe emitter
///
/// Listeners register against an exact [`EventId`] or a
/// [`Pattern`](crate::Pattern). Emitting a name fires its exact listeners and
/// every pattern listener whose pattern matches the name, in the order they
/// were registered.
///
/// The handle is cheap to clone; clones share one registry. Listeners may
/// capture a clone (or a [`WeakEmitter`]) to emit, register, or remove
/// listeners while they run.
///
/// # Listener lookups are asymmetric
///
/// [`listeners`](Self::listeners) returns one bucket as stored: an exact key
/// never reports pattern listeners and vice versa.
/// [`listener_count`](Self::listener_count) and [`emit`](Self::emit) resolve
/// the full match set across both.
pub struct PatternEmitter<A> {
    pub(crate) state: Arc<RwLock<EmitterState<A>>>,
    pub(crate) sequence: SequenceSource,
}

impl<A> PatternEmitter<A> {
    /// Create an emitter ordered by the process-wide sequence
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Create an emitter with configuration
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(EmitterState::new(config))),
            sequence: SequenceSource::global(),
        }
    }

    /// Draw registration order from `sequence` instead of the global source
    ///
    /// Emitters sharing a source share one total order.
    pub fn with_sequence(mut self, sequence: SequenceSource) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sequence source this emitter registers with
    pub fn sequence(&self) -> &SequenceSource {
        &self.sequence
    }

    /// Non-owning handle, for listeners that refer back to their emitter
    pub fn downgrade(&self) -> WeakEmitter<A> {
        WeakEmitter {
            state: Arc::downgrade(&self.state),
            sequence: self.sequence.clone(),
        }
    }

    /// Register `listener` under `key`
    ///
    /// The same listener may be registered any number of times; each
    /// registration fires independently.
    pub fn on(&self, key: impl Into<Key>, listener: Listener<A>) -> ListenerId {
        self.register(key.into(), listener, false)
    }

    /// Alias of [`on`](Self::on)
    pub fn add_listener(&self, key: impl Into<Key>, listener: Listener<A>) -> ListenerId {
        self.on(key, listener)
    }

    /// Register `listener` to fire at most once
    ///
    /// The registration is removed before the listener runs, so a re-entrant
    /// emission from inside the listener cannot reach it again. It can still
    /// be removed beforehand with [`off`](Self::off) using the same handle.
    pub fn once(&self, key: impl Into<Key>, listener: Listener<A>) -> ListenerId {
        self.register(key.into(), listener, true)
    }

    fn register(&self, key: Key, listener: Listener<A>, once: bool) -> ListenerId {
        let mut state = self.state.write();
        // Drawn under the lock so every bucket stays sorted by sequence.
        let id = self.sequence.next_id();
        let (bucket, count) = state.registry.insert(key.clone(), id, listener, once);
        state.cache.invalidate();
        state.check_max_listeners(&key, bucket, count);

        debug!(key = %key, listener = %id, once = once, "Registered listener");
        id
    }

    /// Remove one registration of `listener` under `key`
    ///
    /// When the listener is registered several times under `key`, only the
    /// most recently added registration is removed. Registrations under other
    /// keys are untouched. Returns whether anything was removed.
    pub fn off(&self, key: impl Into<Key>, listener: &Listener<A>) -> bool {
        let key = key.into();
        let mut state = self.state.write();
        match state.registry.remove_listener(&key, listener) {
            Some(id) => {
                state.cache.invalidate();
                debug!(key = %key, listener = %id, "Removed listener");
                true
            }
            None => false,
        }
    }

    /// Alias of [`off`](Self::off)
    pub fn remove_listener(&self, key: impl Into<Key>, listener: &Listener<A>) -> bool {
        self.off(key, listener)
    }

    /// Remove exactly the registration `id` returned by `on` or `once`
    pub fn remove_listener_by_id(&self, id: ListenerId) -> bool {
        let mut state = self.state.write();
        let removed = state.registry.remove_id_anywhere(id);
        if removed {
            state.cache.invalidate();
            debug!(listener = %id, "Removed listener by id");
        }
        removed
    }

    /// Remove every listener from every key
    ///
    /// Returns how many registrations were removed.
    pub fn remove_all_listeners(&self) -> usize {
        let mut state = self.state.write();
        let removed = state.registry.clear();
        state.cache.invalidate();
        state.warned.clear();

        debug!(removed = removed, "Removed all listeners");
        removed
    }

    /// Remove every listener registered under `key`
    ///
    /// Pattern listeners that would match an exact key are not affected.
    pub fn remove_listeners_for(&self, key: impl Into<Key>) -> usize {
        let key = key.into();
        let mut state = self.state.write();
        let removed = state.registry.clear_key(&key);
        if removed > 0 {
            state.cache.invalidate();
            debug!(key = %key, removed = removed, "Removed listeners for key");
        }
        removed
    }

    /// Listeners stored under `key`, in firing order
    ///
    /// Only the bucket for `key` itself is returned: an exact key does not
    /// include matching pattern listeners.
    pub fn listeners(&self, key: impl Into<Key>) -> Vec<Listener<A>> {
        let key = key.into();
        let state = self.state.read();
        listeners_of(state.registry.bucket(&key))
    }

    /// Listeners stored under a pattern key
    ///
    /// # Errors
    ///
    /// Returns [`EmitterError::NotAPattern`](crate::EmitterError::NotAPattern)
    /// if `key` is an exact key.
    pub fn pattern_listeners(&self, key: impl Into<Key>) -> Result<Vec<Listener<A>>> {
        let key = key.into();
        let state = self.state.read();
        Ok(listeners_of(state.registry.pattern_bucket(&key)?))
    }

    /// Number of listeners an emission of `event` would fire
    ///
    /// Includes pattern listeners that match `event`.
    pub fn listener_count(&self, event: impl Into<EventId>) -> usize {
        self.resolve(&event.into(), Resolve::Inspect).len()
    }

    /// Whether an emission of `event` would fire anything
    pub fn has_listeners(&self, event: impl Into<EventId>) -> bool {
        self.listener_count(event) > 0
    }

    /// Exact keys with at least one listener
    pub fn event_names(&self) -> Vec<EventId> {
        self.state.read().registry.event_ids()
    }

    /// Canonical forms of patterns with at least one listener
    pub fn event_patterns(&self) -> Vec<String> {
        self.state.read().registry.pattern_keys()
    }

    /// Every key, exact and pattern, with its listeners
    pub fn all_listeners(&self) -> HashMap<Key, Vec<Listener<A>>> {
        self.state.read().registry.all()
    }

    /// Current leak-warning threshold (0 means disabled)
    pub fn max_listeners(&self) -> usize {
        self.state.read().config.max_listeners
    }

    /// Change the leak-warning threshold (0 disables it)
    pub fn set_max_listeners(&self, max: usize) {
        self.state.write().config.max_listeners = max;
    }

    /// Configuration currently in effect
    pub fn config(&self) -> EmitterConfig {
        self.state.read().config.clone()
    }

    /// Match-cache statistics
    ///
    /// Only emissions count as hits and misses; `listener_count` and
    /// `has_listeners` read the cache without being recorded.
    pub fn cache_stats(&self) -> CacheStats {
        self.state.read().cache.stats()
    }
}

impl<A> Clone for PatternEmitter<A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            sequence: self.sequence.clone(),
        }
    }
}

impl<A> Default for PatternEmitter<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for PatternEmitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("PatternEmitter")
            .field("listeners", &state.registry.len())
            .field("patterns", &state.registry.pattern_keys().len())
            .field("config", &state.config)
            .finish()
    }
}

/// Non-owning emitter handle
///
/// Holding one inside a listener avoids a reference cycle between the
/// emitter and its own listeners.
pub struct WeakEmitter<A> {
    state: Weak<RwLock<EmitterState<A>>>,
    sequence: SequenceSource,
}

impl<A> WeakEmitter<A> {
    /// Recover the emitter if it is still alive
    pub fn upgrade(&self) -> Option<PatternEmitter<A>> {
        self.state.upgrade().map(|state| PatternEmitter {
            state,
            sequence: self.sequence.clone(),
        })
    }
}

impl<A> Clone for WeakEmitter<A> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
            sequence: self.sequence.clone(),
        }
    }
}
