//! Regular-expression keys
//!
//! A [`Pattern`] is bucketed by its canonical form `/source/flags`, not by
//! the instance that registered it: two patterns compiled separately from the
//! same source and flags land in the same bucket.

use std::{fmt, hash::Hash, sync::Arc};

use regex::{Regex, RegexBuilder};

use crate::error::{EmitterError, Result};

const SUPPORTED_FLAGS: &str = "imsxU";

/// Compiled regular expression used as a registration key
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    source: Arc<str>,
    flags: Arc<str>,
    canonical: Arc<str>,
}

impl Pattern {
    /// Compile a pattern with no flags
    ///
    /// # Errors
    ///
    /// Returns [`EmitterError::InvalidPattern`] if the source does not compile.
    pub fn new(source: &str) -> Result<Self> {
        Self::with_flags(source, "")
    }

    /// Compile a pattern with flags
    ///
    /// Supported flags:
    /// * `i` - case-insensitive
    /// * `m` - `^` and `$` match at line boundaries
    /// * `s` - `.` matches `\n`
    /// * `x` - ignore whitespace and allow `#` comments
    /// * `U` - swap greedy and lazy quantifiers
    ///
    /// Flag order and repetition do not matter; `"mi"` and `"imi"` produce
    /// the same canonical form as `"im"`.
    ///
    /// # Errors
    ///
    /// Returns [`EmitterError::InvalidPattern`] for unknown flags or a source
    /// that does not compile.
    pub fn with_flags(source: &str, flags: &str) -> Result<Self> {
        let flags = normalize_flags(flags)?;

        let regex = RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .ignore_whitespace(flags.contains('x'))
            .swap_greed(flags.contains('U'))
            .build()?;

        let canonical = canonicalize(source, &flags);
        Ok(Self {
            regex,
            source: Arc::from(source),
            flags: Arc::from(flags),
            canonical: Arc::from(canonical),
        })
    }

    /// Pattern source as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Normalized flags
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Bucket key, `/source/flags`
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Whether the pattern matches anywhere in `subject`
    pub fn test(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// Underlying compiled regex
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Canonical bucket key for a source and normalized flag string
pub fn canonicalize(source: &str, flags: &str) -> String {
    format!("/{}/{}", source, flags)
}

fn normalize_flags(flags: &str) -> Result<String> {
    let mut normalized: Vec<char> = Vec::with_capacity(flags.len());
    for flag in flags.chars() {
        if !SUPPORTED_FLAGS.contains(flag) {
            return Err(EmitterError::InvalidPattern(format!(
                "unsupported flag '{}' (expected any of '{}')",
                flag, SUPPORTED_FLAGS
            )));
        }
        normalized.push(flag);
    }
    normalized.sort_unstable();
    normalized.dedup();
    Ok(normalized.into_iter().collect())
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl TryFrom<&str> for Pattern {
    type Error = EmitterError;

    fn try_from(source: &str) -> Result<Self> {
        Pattern::new(source)
    }
}
