//! Error types for the pattern emitter
//!
//! Registration and removal never fail: unknown keys and listeners are
//! no-ops. Errors surface from three places only:
//!
//! 1. **Pattern construction**: an invalid regular expression or an
//!    unsupported flag is rejected when the [`Pattern`](crate::Pattern) is
//!    built, before it can reach a registry.
//!
//! 2. **Emission**: a listener that returns `Err` aborts the emission. The
//!    listeners sequenced after it do not run for that emission, and the
//!    failure is returned from [`emit`](crate::PatternEmitter::emit) as
//!    [`EmitterError::ListenerFailed`].
//!
//! 3. **Configuration**: loading an [`EmitterConfig`](crate::EmitterConfig)
//!    from disk or from a string.
//!
//! # Examples
//!
//! ```ignore
//! match emitter.emit("user::login", &payload) {
//!     Ok(true) => {}
//!     Ok(false) => tracing::debug!("nobody was listening"),
//!     Err(EmitterError::ListenerFailed { listener, source, .. }) => {
//!         eprintln!("listener {} failed: {}", listener, source)
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

use crate::types::ListenerId;

/// Error a listener hands back to the dispatcher
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Return type of every listener
pub type ListenerResult = std::result::Result<(), ListenerError>;

/// Errors that can occur in the pattern emitter
#[derive(Debug, Error)]
pub enum EmitterError {
    /// Pattern source or flags could not be compiled
    ///
    /// Common causes:
    /// - Unbalanced groups or invalid escapes in the source
    /// - A flag outside `imsxU`
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A pattern-only accessor was called with an exact key
    ///
    /// The string contains the offending key.
    #[error("Expected a pattern key, got exact key: {0}")]
    NotAPattern(String),

    /// A listener failed during emission
    ///
    /// Listeners after the failing one were not invoked for this emission.
    #[error("Listener {listener} failed while handling '{event}': {source}")]
    ListenerFailed {
        /// The emitted identifier
        event: String,
        /// Registration handle of the failing listener
        listener: ListenerId,
        /// Error returned by the listener
        #[source]
        source: ListenerError,
    },

    /// Invalid emitter configuration
    #[error("Invalid emitter configuration: {0}")]
    InvalidConfiguration(String),

    /// YAML configuration could not be parsed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// JSON configuration could not be parsed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<regex::Error> for EmitterError {
    fn from(err: regex::Error) -> Self {
        EmitterError::InvalidPattern(err.to_string())
    }
}

/// Result type for emitter operations
pub type Result<T> = std::result::Result<T, EmitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_error_maps_to_invalid_pattern() {
        let err: EmitterError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, EmitterError::InvalidPattern(_)));
    }

    #[test]
    fn test_listener_failed_display_names_event_and_listener() {
        let err = EmitterError::ListenerFailed {
            event: "save".to_string(),
            listener: ListenerId::from_raw(7),
            source: "boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("save"));
        assert!(msg.contains("#7"));
        assert!(msg.contains("boom"));
    }
}
