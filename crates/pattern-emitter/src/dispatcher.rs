//! Emission
//!
//! `emit` resolves the ordered match set for an identifier, releases the
//! registry lock, then invokes each listener in turn with the caller's
//! arguments. Because dispatch walks a snapshot, listeners may freely emit,
//! register, or remove listeners; changes apply to later emissions.
//!
//! Two rules refine the snapshot:
//!
//! 1. A `once` registration is removed from the registry *before* its
//!    listener runs, and it runs only if that removal succeeded. A re-entrant
//!    emission, or an earlier listener calling `off`, therefore prevents it
//!    from firing a second time or after removal.
//!
//! 2. Listener failures are fail-fast. The first `Err` stops the emission:
//!    listeners sequenced after it do not run, and the error is returned from
//!    `emit`. Listener panics are not caught either.

use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::{
    emitter::PatternEmitter,
    error::{EmitterError, Result},
    matcher::match_records,
    registry::Record,
    types::EventId,
};

/// Why a match set is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolve {
    /// Dispatch; counted in cache statistics
    Emit,
    /// Read-only introspection
    Inspect,
}

impl<A> PatternEmitter<A> {
    /// Invoke every listener matching `event`, in registration order
    ///
    /// Returns `Ok(true)` if at least one listener matched and `Ok(false)` if
    /// none did. The flag says nothing about what the listeners did.
    ///
    /// # Errors
    ///
    /// Returns [`EmitterError::ListenerFailed`] for the first listener that
    /// fails; the remaining listeners of this emission are skipped.
    pub fn emit(&self, event: impl Into<EventId>, args: &A) -> Result<bool> {
        let event = event.into();
        let records = self.resolve(&event, Resolve::Emit);

        if records.is_empty() {
            debug!(event = %event, "No listeners for event");
            return Ok(false);
        }

        trace!(event = %event, listener_count = records.len(), "Dispatching event");

        for record in records.iter() {
            if record.once && !self.claim_once(record) {
                trace!(event = %event, listener = %record.id, "Once listener already consumed");
                continue;
            }

            if let Err(source) = record.listener.call(args) {
                error!(
                    event = %event,
                    listener = %record.id,
                    error = %source,
                    "Listener failed, aborting emission"
                );
                return Err(EmitterError::ListenerFailed {
                    event: event.to_string(),
                    listener: record.id,
                    source,
                });
            }
        }

        Ok(true)
    }

    /// Ordered match set for `event`
    ///
    /// [`Resolve::Inspect`] serves introspection: it reads a cached set if
    /// one exists but never counts toward [`CacheStats`](crate::CacheStats)
    /// and never fills the cache.
    pub(crate) fn resolve(&self, event: &EventId, mode: Resolve) -> Arc<[Record<A>]> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        // Without patterns the match set is the exact bucket.
        if state.config.fast_path && !state.registry.has_patterns() {
            return Arc::from(state.registry.exact_bucket(event));
        }

        if state.config.match_cache {
            let cached = match mode {
                Resolve::Emit => state.cache.lookup(event),
                Resolve::Inspect => state.cache.peek(event),
            };
            if let Some(records) = cached {
                trace!(event = %event, "Match cache hit");
                return records;
            }
        }

        let records: Arc<[Record<A>]> = Arc::from(match_records(&state.registry, event));
        if state.config.match_cache && mode == Resolve::Emit {
            trace!(event = %event, matched = records.len(), "Match cache miss");
            state.cache.store(event.clone(), Arc::clone(&records));
        }
        records
    }

    /// Remove a `once` record ahead of its invocation
    ///
    /// Returns `false` if something else already removed it.
    fn claim_once(&self, record: &Record<A>) -> bool {
        let mut state = self.state.write();
        let claimed = state.registry.remove_id(&record.bucket, record.id);
        if claimed {
            state.cache.invalidate();
        }
        claimed
    }
}
