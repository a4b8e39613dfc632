//! Subscription pattern validation and matching.
//!
//! Patterns are regular expressions matched anywhere in an event name
//! (unanchored). Compiled expressions are cached in a `DashMap` so the
//! dispatch path does not recompile them for every fired event.

use dashmap::DashMap;
use regex::Regex;
use tracing::warn;

use crate::error::RegistryError;

/// Cache size past which compiled patterns are discarded.
const MAX_CACHED_PATTERNS: usize = 1024;

/// Compiles, caches and evaluates subscription patterns.
pub struct PatternMatcher {
    cache: DashMap<String, Regex>,
}

impl PatternMatcher {
    /// Create a matcher with an empty cache.
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Some(re) = self.cache.get(pattern) {
            return Ok(re.value().clone());
        }

        let re = Regex::new(pattern)?;
        if self.cache.len() >= MAX_CACHED_PATTERNS {
            self.cache.clear();
        }
        self.cache.insert(pattern.to_string(), re.clone());
        Ok(re)
    }

    /// Whether `pattern` matches `name`. Invalid patterns never match.
    pub fn is_match(&self, pattern: &str, name: &str) -> bool {
        match self.compile(pattern) {
            Ok(re) => re.is_match(name),
            Err(e) => {
                warn!("Skipping invalid pattern '{}': {}", pattern, e);
                false
            }
        }
    }

    /// Whether any of `patterns` matches `name`.
    pub fn matches_any(&self, patterns: &[String], name: &str) -> bool {
        patterns.iter().any(|p| self.is_match(p, name))
    }

    /// Check that every pattern matches at least one catalog entry.
    ///
    /// Rejects an empty pattern list, patterns that fail to compile, and
    /// patterns matching no catalog entry. The error names every offender.
    pub fn validate(&self, patterns: &[String], catalog: &[String]) -> Result<(), RegistryError> {
        if patterns.is_empty() {
            return Err(RegistryError::Validation(
                "enabledEvents must contain at least one event or pattern".to_string(),
            ));
        }

        let mut problems = Vec::new();
        for pattern in patterns {
            match self.compile(pattern) {
                Ok(re) => {
                    if !catalog.iter().any(|event| re.is_match(event)) {
                        problems.push(format!("'{}' matches no available event", pattern));
                    }
                }
                Err(e) => problems.push(format!("'{}' is not a valid pattern: {}", pattern, e)),
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Validation(format!(
                "invalid enabledEvents: {}",
                problems.join("; ")
            )))
        }
    }

    /// Number of compiled patterns currently cached.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}
