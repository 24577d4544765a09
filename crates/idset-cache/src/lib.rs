//! In-memory, TTL-bound result cache for interactive datasets.
//!
//! Entries are keyed by a fingerprint of the executed SQL and its bound
//! parameters. Expired entries read as misses immediately and are physically
//! removed by the [`CacheSweeper`].

pub mod keys;
pub mod store;
pub mod sweeper;
pub mod types;

pub use keys::{Fingerprint, fingerprint};
pub use store::ResultCache;
pub use sweeper::{CacheSweeper, DEFAULT_SWEEP_INTERVAL, MIN_SWEEP_INTERVAL};
pub use types::{CacheEntry, CacheStats};
