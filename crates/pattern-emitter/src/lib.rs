//! Pattern Emitter
//!
//! Synchronous, in-process publish/subscribe where listeners subscribe to an
//! exact event identifier or to a regular expression.
//!
//! # Overview
//!
//! Emitting a name fires every listener registered under that exact name plus
//! every listener whose pattern matches the name. All of them fire in one
//! order: the order they were registered in, across exact and pattern keys
//! alike.
//!
//! # Architecture
//!
//! The system consists of four main components:
//!
//! 1. **Registry** (`registry`): exact and pattern buckets, ordered by a
//!    shared sequence (`sequence`)
//! 2. **Matcher** (`matcher`): merges exact and pattern records for one
//!    identifier
//! 3. **Cache** (`cache`): memoizes match sets until the registry changes
//! 4. **Dispatcher** (`dispatcher`): invokes the match set and reports
//!    whether anything listened
//!
//! # Quick Start
//!
//! ```ignore
//! use pattern_emitter::{Listener, Pattern, PatternEmitter};
//!
//! let emitter: PatternEmitter<String> = PatternEmitter::new();
//!
//! emitter.on("user::login", Listener::infallible(|name: &String| {
//!     println!("exact: {}", name);
//! }));
//! emitter.on(Pattern::new("^user::")?, Listener::infallible(|name: &String| {
//!     println!("pattern: {}", name);
//! }));
//!
//! // Fires both, exact first because it was registered first.
//! assert!(emitter.emit("user::login", &"ada".to_string())?);
//!
//! // Fires the pattern listener only.
//! assert!(emitter.emit("user::logout", &"ada".to_string())?);
//!
//! // Nobody listens.
//! assert!(!emitter.emit("system::boot", &"ada".to_string())?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Keys
//!
//! - **Names** (`&str`, `String`) match by value and are the only identifiers
//!   patterns are tested against.
//! - **Symbols** ([`Symbol`]) match by identity and only ever exactly.
//! - **Patterns** ([`Pattern`]) are bucketed by their canonical `/source/flags`
//!   form, so two separately compiled patterns with the same source and flags
//!   share listeners.
//!
//! # Listener identity
//!
//! A [`Listener`] handle is the unit of identity for removal. Keep a clone of
//! the handle you registered to pass to [`PatternEmitter::off`]. Each `off`
//! call removes a single registration, the most recent one under that key.
//!
//! # Error Handling
//!
//! All fallible operations return `Result<T>`, an alias for
//! `std::result::Result<T, EmitterError>`. Registration and removal never
//! fail. A listener returning `Err` stops the emission it is part of.
//!
//! # Thread Safety
//!
//! Emitters are `Send + Sync` and cheap to clone, but dispatch is synchronous
//! on the calling thread and concurrent emissions are not serialized.

pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod sequence;
pub mod types;

// Re-export public types
pub use cache::CacheStats;
pub use config::{ConfigLoader, ConfigValidator, EmitterConfig};
pub use emitter::{PatternEmitter, WeakEmitter};
pub use error::{EmitterError, ListenerError, ListenerResult, Result};
pub use pattern::Pattern;
pub use registry::{BucketKey, Record, Registry};
pub use sequence::SequenceSource;
pub use types::{EventId, Key, Listener, ListenerId, Symbol};
