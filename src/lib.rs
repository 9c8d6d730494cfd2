//! JSON Cache - A thread-safe in-process byte cache
//!
//! Stores opaque byte values (typically serialized JSON) with per-entry TTL
//! expiration and least-recently-used eviction at a fixed capacity.
//!
//! ```
//! use json_cache::Cache;
//!
//! let cache = Cache::new(2);
//! cache.set("a", "apple", 1000);
//! cache.set("b", "banana", 1000);
//! cache.set("c", "cherry", 1000);
//!
//! assert_eq!(cache.get("a"), None);
//! assert_eq!(cache.get("c"), Some(b"cherry".to_vec()));
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, DEFAULT_CAPACITY};
pub use config::{CacheConfig, SweepPolicy};
pub use error::{CacheError, Result};
