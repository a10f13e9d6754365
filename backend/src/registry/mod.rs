//! Uniqueness Registry - run-scoped memory of accepted emails and ids.
//!
//! One registry is created per run and owned by the batch processor. Values
//! are compared exactly (no case folding); emails and ids live in separate
//! namespaces.

use std::collections::HashSet;

/// The kind of value tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Email,
    Id,
}

/// Set of email and id values already accepted in this run.
#[derive(Debug, Default)]
pub struct UniquenessRegistry {
    emails: HashSet<String>,
    ids: HashSet<String>,
}

impl UniquenessRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, key: UniqueKey) -> &HashSet<String> {
        match key {
            UniqueKey::Email => &self.emails,
            UniqueKey::Id => &self.ids,
        }
    }

    /// Check whether a value was already registered for `key`
    pub fn contains(&self, key: UniqueKey, value: &str) -> bool {
        self.set(key).contains(value)
    }

    /// Register a value.
    ///
    /// Returns `false` (and leaves the registry untouched) if the value was
    /// already taken for that key.
    pub fn register(&mut self, key: UniqueKey, value: &str) -> bool {
        let set = match key {
            UniqueKey::Email => &mut self.emails,
            UniqueKey::Id => &mut self.ids,
        };
        if set.contains(value) {
            return false;
        }
        set.insert(value.to_string())
    }

    /// Number of values registered for `key`
    pub fn len(&self, key: UniqueKey) -> usize {
        self.set(key).len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.ids.is_empty()
    }
}
