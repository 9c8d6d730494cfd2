//! Cache Store Module
//!
//! Main cache engine combining the key index with the recency list and TTL
//! expiration.
//!
//! # Locking
//! `index` is the coarse lock: `set` and `delete` hold it exclusively, `get`
//! holds it shared. `list` guards node links and values and is taken under
//! either mode, so concurrent readers can still reorder recency. Lock order is
//! always `index` then `list`.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::cache::entry::expiry_after;
use crate::cache::index::Index;
use crate::cache::list::RecencyList;
use crate::config::{CacheConfig, SweepPolicy};
use crate::error::Result;

// == Cache ==
/// Thread-safe byte cache with LRU eviction and lazy TTL expiration.
#[derive(Debug)]
pub struct Cache {
    /// Key -> node and expiry
    index: RwLock<Index>,
    /// Recency order, node keys and values
    list: Mutex<RecencyList>,
    /// Maximum number of entries, fixed at construction
    capacity: usize,
    /// Write-path expiry sweep
    sweep: SweepPolicy,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 selects [`DEFAULT_CAPACITY`](crate::cache::DEFAULT_CAPACITY).
    pub fn new(capacity: usize) -> Self {
        Self::with_config(CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    /// Creates a cache from a full configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        let capacity = config.effective_capacity();
        debug!(capacity, sweep = %config.sweep, "Cache created");
        Self {
            index: RwLock::new(Index::new()),
            list: Mutex::new(RecencyList::new()),
            capacity,
            sweep: config.sweep,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_ms` milliseconds.
    ///
    /// Expired entries are swept first according to the sweep policy. An
    /// existing key is updated in place and becomes the most recently used.
    /// A new key evicts the least recently used entry when the cache is full.
    /// A TTL of zero or less stores an entry that is already expired.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>, ttl_ms: i64) {
        let key = key.into();
        let value = value.into();

        let mut index = self.index.write();
        let now = Utc::now();
        let expires_at = expiry_after(now, ttl_ms);
        self.sweep_expired(&mut index, now);

        let mut list = self.list.lock();
        match index.get(&key) {
            Some(existing) => {
                list.set_value(existing.node, value);
                list.move_to_head(existing.node);
                index.put(key, existing.node, expires_at);
            }
            None => {
                if list.len() >= self.capacity {
                    if let Some(victim) = list.remove_tail() {
                        index.delete(&victim);
                        debug!(key = %victim, "Evicted least recently used entry");
                    }
                }
                let node = list.alloc(key.clone(), value);
                list.add_to_head(node);
                index.put(key, node, expires_at);
            }
        }
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    ///
    /// A hit marks the entry as most recently used. An expired entry is
    /// removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        {
            let index = self.index.read();
            let entry = index.get(key)?;
            if !entry.is_expired(Utc::now()) {
                let mut list = self.list.lock();
                list.move_to_head(entry.node);
                return Some(list.value(entry.node).to_vec());
            }
        }
        self.expire(key);
        None
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        let mut index = self.index.write();
        match index.delete(key) {
            Some(entry) => {
                self.list.lock().remove(entry.node);
                true
            }
            None => false,
        }
    }

    // == Typed JSON ==
    /// Serializes `value` as JSON and stores it under `key`.
    pub fn set_json<T>(&self, key: impl Into<String>, value: &T, ttl_ms: i64) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, bytes, ttl_ms);
        Ok(())
    }

    /// Fetches `key` and deserializes it from JSON.
    ///
    /// Returns `Ok(None)` when the key is absent or expired.
    pub fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    // == Introspection ==
    /// Returns the number of stored entries, including expired ones not yet
    /// reclaimed.
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the keys from most to least recently used without touching
    /// their recency.
    pub fn keys_by_recency(&self) -> Vec<String> {
        let _index = self.index.read();
        let list = self.list.lock();
        let keys = list.iter().map(|id| list.key(id).to_string()).collect();
        keys
    }

    // == Expiry ==
    /// Removes `key` if it is still expired once the exclusive lock is held.
    ///
    /// Another writer may have refreshed the key since the shared lock was
    /// released, so the deadline is checked again.
    fn expire(&self, key: &str) {
        let mut index = self.index.write();
        let Some(entry) = index.get(key) else {
            return;
        };
        if entry.is_expired(Utc::now()) {
            index.delete(key);
            self.list.lock().remove(entry.node);
            debug!(key, "Removed expired entry on read");
        }
    }

    /// Reclaims expired entries before a write. Caller holds `index` exclusively.
    fn sweep_expired(&self, index: &mut Index, now: DateTime<Utc>) {
        let expired = match self.sweep {
            SweepPolicy::Full => index.expired_keys(now),
            SweepPolicy::Tail { limit } => {
                let list = self.list.lock();
                let keys: Vec<String> = list
                    .iter_from_tail()
                    .take(limit)
                    .map(|id| list.key(id))
                    .filter(|key| index.get(key).is_some_and(|entry| entry.is_expired(now)))
                    .map(str::to_string)
                    .collect();
                keys
            }
            SweepPolicy::Off => return,
        };
        if expired.is_empty() {
            return;
        }

        let mut list = self.list.lock();
        for key in &expired {
            if let Some(entry) = index.delete(key) {
                list.remove(entry.node);
            }
        }
        trace!(removed = expired.len(), "Swept expired entries");
    }

    // == Invariant Check ==
    /// Panics unless the list and index describe exactly the same entries.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let index = self.index.read();
        let list = self.list.lock();

        assert_eq!(list.len(), index.len(), "list length differs from index size");
        assert!(list.len() <= self.capacity, "cache exceeds capacity");

        let forward: Vec<_> = list.iter().collect();
        let mut backward: Vec<_> = list.iter_from_tail().collect();
        backward.reverse();
        assert_eq!(forward, backward, "forward and backward links disagree");
        assert_eq!(forward.len(), list.len(), "walked nodes differ from length");

        for id in forward {
            let key = list.key(id);
            let entry = index
                .get(key)
                .unwrap_or_else(|| panic!("linked key '{}' missing from index", key));
            assert_eq!(entry.node, id, "index points '{}' at another node", key);
        }
        for (key, entry) in index.iter() {
            assert_eq!(list.key(entry.node), key, "index entry '{}' not linked", key);
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::with_config(CacheConfig::default())
    }
}
