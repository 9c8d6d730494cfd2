//! Index Entry Module
//!
//! What the index stores per key: the node handle and its absolute expiry.

use chrono::{DateTime, TimeDelta, Utc};

use crate::cache::list::NodeId;

// == Index Entry ==
/// Location and deadline of a cached key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Node holding the key and value in the recency list
    pub node: NodeId,
    /// Wall-clock instant at which the entry stops being served
    pub expires_at: DateTime<Utc>,
}

impl IndexEntry {
    // == Constructor ==
    pub fn new(node: NodeId, expires_at: DateTime<Utc>) -> Self {
        Self { node, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches `expires_at`,
    /// so a TTL of zero yields an entry that is already expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns the instant `ttl_ms` milliseconds after `now`.
///
/// Zero and negative TTLs are accepted. Results outside chrono's range
/// saturate to the earliest or latest representable instant.
pub fn expiry_after(now: DateTime<Utc>, ttl_ms: i64) -> DateTime<Utc> {
    TimeDelta::try_milliseconds(ttl_ms)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(if ttl_ms < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::list::RecencyList;

    fn node() -> NodeId {
        RecencyList::new().alloc("k".to_string(), Vec::new())
    }

    #[test]
    fn test_expiry_after_adds_milliseconds() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, 1500) - now, TimeDelta::milliseconds(1500));
        assert_eq!(expiry_after(now, -20) - now, TimeDelta::milliseconds(-20));
    }

    #[test]
    fn test_expiry_after_saturates() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(expiry_after(now, i64::MIN), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_entry_not_expired_before_deadline() {
        let now = Utc::now();
        let entry = IndexEntry::new(node(), expiry_after(now, 60_000));
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let entry = IndexEntry::new(node(), now);

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired(now), "Entry should be expired at boundary");
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let now = Utc::now();
        let entry = IndexEntry::new(node(), expiry_after(now, -1));
        assert!(entry.is_expired(now));
    }
}
