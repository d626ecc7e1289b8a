//! Core data types for the pattern emitter
//!
//! This module defines the keys listeners register against, the listener
//! handle itself, and the registration handle returned by `on`.
//!
//! # Examples
//!
//! ```ignore
//! use pattern_emitter::*;
//!
//! let exact: Key = "user::login".into();
//! let token = Symbol::new("shutdown");
//! let by_symbol: Key = token.clone().into();
//! let by_pattern: Key = Pattern::new("^user::")?.into();
//! ```

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{error::ListenerResult, pattern::Pattern};

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// A unique identifier token
///
/// Every call to [`Symbol::new`] mints a token that is equal only to itself
/// and its clones, even if two tokens share a description. Symbols are
/// matched exactly and never tested against patterns.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Mint a new token with a description used only for display
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: Some(Arc::from(description.into())),
        }
    }

    /// Mint a new token without a description
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    /// Description given at creation, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

/// Exact-match event identifier
///
/// Names compare by value, symbols by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventId {
    /// Textual identifier, the only kind patterns can test
    Name(String),

    /// Unique token, exact matching only
    Symbol(Symbol),
}

impl EventId {
    /// Text of the identifier, or `None` for symbols
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventId::Name(name) => Some(name),
            EventId::Symbol(_) => None,
        }
    }

    /// Whether this identifier is a symbol token
    pub fn is_symbol(&self) -> bool {
        matches!(self, EventId::Symbol(_))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Name(name) => f.write_str(name),
            EventId::Symbol(symbol) => fmt::Display::fmt(symbol, f),
        }
    }
}

impl From<&str> for EventId {
    fn from(name: &str) -> Self {
        EventId::Name(name.to_string())
    }
}

impl From<String> for EventId {
    fn from(name: String) -> Self {
        EventId::Name(name)
    }
}

impl From<&String> for EventId {
    fn from(name: &String) -> Self {
        EventId::Name(name.clone())
    }
}

impl From<Symbol> for EventId {
    fn from(symbol: Symbol) -> Self {
        EventId::Symbol(symbol)
    }
}

impl From<&Symbol> for EventId {
    fn from(symbol: &Symbol) -> Self {
        EventId::Symbol(symbol.clone())
    }
}

impl From<&EventId> for EventId {
    fn from(id: &EventId) -> Self {
        id.clone()
    }
}

/// Registration key: an exact identifier or a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Matches one identifier exactly
    Event(EventId),

    /// Matches every textual identifier the pattern accepts
    Pattern(Pattern),
}

impl Key {
    /// Whether this key is a pattern
    pub fn is_pattern(&self) -> bool {
        matches!(self, Key::Pattern(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Event(id) => fmt::Display::fmt(id, f),
            Key::Pattern(pattern) => fmt::Display::fmt(pattern, f),
        }
    }
}

macro_rules! key_from_event_id {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Key {
                fn from(id: $ty) -> Self {
                    Key::Event(EventId::from(id))
                }
            }
        )*
    };
}

key_from_event_id!(&str, String, &String, Symbol, &Symbol, &EventId);

impl From<EventId> for Key {
    fn from(id: EventId) -> Self {
        Key::Event(id)
    }
}

impl From<Pattern> for Key {
    fn from(pattern: Pattern) -> Self {
        Key::Pattern(pattern)
    }
}

impl From<&Pattern> for Key {
    fn from(pattern: &Pattern) -> Self {
        Key::Pattern(pattern.clone())
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Registration handle
///
/// Carries the record's global sequence number, which also defines the
/// order listeners fire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw sequence number
    pub fn from_raw(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Raw sequence number
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Callback<A> = dyn Fn(&A) -> ListenerResult + Send + Sync;

/// A listener callable
///
/// Cloning the handle yields the *same* listener: removal and introspection
/// compare handles by the allocation they share, never by behaviour. Two
/// handles built from identical closures are different listeners.
pub struct Listener<A> {
    callback: Arc<Callback<A>>,
}

impl<A> Listener<A> {
    /// Wrap a fallible callback
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&A) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Wrap a callback that cannot fail
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        Self::new(move |args| {
            callback(args);
            Ok(())
        })
    }

    /// Whether both handles refer to the same listener
    pub fn same(&self, other: &Listener<A>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }

    /// Invoke the listener
    pub fn call(&self, args: &A) -> ListenerResult {
        (self.callback)(args)
    }
}

impl<A> Clone for Listener<A> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<A> PartialEq for Listener<A> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<A> Eq for Listener<A> {}

impl<A> fmt::Debug for Listener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_compare_by_identity() {
        let a = Symbol::new("tick");
        let b = Symbol::new("tick");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "Symbol(tick)");
    }

    #[test]
    fn test_names_compare_by_value() {
        assert_eq!(EventId::from("save"), EventId::from("save".to_string()));
        assert_eq!(EventId::from("save").as_str(), Some("save"));
        assert_eq!(EventId::from(Symbol::anonymous()).as_str(), None);
    }

    #[test]
    fn test_key_conversions() {
        assert_eq!(Key::from("save"), Key::Event(EventId::Name("save".into())));
        let pattern = Pattern::new("^s").unwrap();
        assert!(Key::from(&pattern).is_pattern());
        assert!(!Key::from(Symbol::anonymous()).is_pattern());
    }

    #[test]
    fn test_listener_identity_follows_handle() {
        let a: Listener<()> = Listener::infallible(|_| {});
        let b: Listener<()> = Listener::infallible(|_| {});
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_listener_call_passes_args() {
        let listener: Listener<i32> = Listener::new(|n| {
            if *n < 0 {
                return Err("negative".into());
            }
            Ok(())
        });
        assert!(listener.call(&1).is_ok());
        assert!(listener.call(&-1).is_err());
    }

    #[test]
    fn test_listener_id_display() {
        assert_eq!(ListenerId::from_raw(3).to_string(), "#3");
        assert!(ListenerId::from_raw(1) < ListenerId::from_raw(2));
    }
}
