//! Index Module
//!
//! Maps each key to its [`IndexEntry`]. Has no ordering of its own; recency
//! lives in the [`RecencyList`](super::list::RecencyList).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::entry::IndexEntry;
use crate::cache::list::NodeId;

// == Index ==
#[derive(Debug, Default)]
pub struct Index {
    entries: HashMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<IndexEntry> {
        self.entries.get(key).copied()
    }

    // == Put ==
    /// Inserts or overwrites the mapping for `key`.
    pub fn put(&mut self, key: String, node: NodeId, expires_at: DateTime<Utc>) {
        self.entries.insert(key, IndexEntry::new(node, expires_at));
    }

    // == Delete ==
    /// Removes the mapping. The caller unlinks the node separately.
    pub fn delete(&mut self, key: &str) -> Option<IndexEntry> {
        self.entries.remove(key)
    }

    // == Expired Keys ==
    /// Collects every key whose entry is expired as of `now`.
    pub fn expired_keys(&self, now: DateTime<Utc>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }
}
