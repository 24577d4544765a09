//! Fingerprint-keyed result storage.

use crate::keys::Fingerprint;
use crate::types::{CacheEntry, CacheStats, past_expiry};
use chrono::{DateTime, Utc};
use idset_core::{Clock, ResultSet};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

struct Slot {
    result: Arc<ResultSet>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    /// Milliseconds since the epoch; bumped by readers under the read lock.
    accessed_at: AtomicI64,
}

impl Slot {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        past_expiry(self.expires_at, now)
    }

    fn snapshot(&self) -> CacheEntry {
        let accessed = self.accessed_at.load(Ordering::Relaxed);
        CacheEntry {
            result: Arc::clone(&self.result),
            created_at: self.created_at,
            last_accessed_at: DateTime::from_timestamp_millis(accessed).unwrap_or(self.created_at),
            expires_at: self.expires_at,
        }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    evictions: AtomicU64,
}

/// Result cache guarded by a single read/write lock.
///
/// `get` and `put` never remove entries; only [`ResultCache::evict_expired`]
/// does. Concurrent misses on the same fingerprint are not coalesced and the
/// last `put` wins.
pub struct ResultCache {
    entries: RwLock<HashMap<Fingerprint, Slot>>,
    clock: Arc<dyn Clock>,
    counters: Counters,
}

impl ResultCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            counters: Counters::default(),
        }
    }

    /// Cached result for `key`, unless absent or past its expiry.
    pub async fn get(&self, key: &Fingerprint) -> Option<Arc<ResultSet>> {
        let now = self.clock.now();
        let entries = self.entries.read().await;

        match entries.get(key) {
            Some(slot) if !slot.is_expired(now) => {
                slot.accessed_at
                    .store(now.timestamp_millis(), Ordering::Relaxed);
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(&slot.result))
            }
            _ => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store `result` under `key` for `ttl`, replacing any previous entry.
    pub async fn put(&self, key: Fingerprint, result: Arc<ResultSet>, ttl: chrono::Duration) {
        let now = self.clock.now();
        let slot = Slot {
            result,
            created_at: now,
            expires_at: now + ttl,
            accessed_at: AtomicI64::new(now.timestamp_millis()),
        };

        self.entries.write().await.insert(key, slot);
        self.counters.stores.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the entry stored under `key`, expired or not.
    pub async fn entry(&self, key: &Fingerprint) -> Option<CacheEntry> {
        self.entries.read().await.get(key).map(Slot::snapshot)
    }

    /// Whether an entry is physically present, expired or not.
    pub async fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every entry whose expiry has passed. Returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();

        entries.retain(|key, slot| {
            let keep = !slot.is_expired(now);
            if !keep {
                debug!(key = %key, "Cached query resultset cleaned");
            }
            keep
        });

        let evicted = before - entries.len();
        self.counters
            .evictions
            .fetch_add(evicted as u64, Ordering::Relaxed);
        evicted
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}
