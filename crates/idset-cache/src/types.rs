//! Cache types.

use chrono::{DateTime, Utc};
use idset_core::ResultSet;
use std::sync::Arc;

/// Snapshot of a cached result and its timestamps.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: Arc<ResultSet>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        past_expiry(self.expires_at, now)
    }
}

/// An entry is still served at exactly its expiry instant.
pub(crate) fn past_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}
