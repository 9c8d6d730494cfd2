//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod index;
mod list;
mod store;


// Re-export public types
pub use store::Cache;

// == Public Constants ==
/// Capacity used when a cache is constructed with a capacity of 0
pub const DEFAULT_CAPACITY: usize = 500;
