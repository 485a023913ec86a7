//! In-memory TTL cache for search results.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::{SearchFilters, SearchKind};

/// Deterministic cache key: SHA-256 over the kind tag and a canonical,
/// key-sorted JSON rendering of the filters.
#[must_use]
pub fn cache_key(kind: SearchKind, filters: &SearchFilters) -> String {
    let canonical = serde_json::to_value(filters).map_or_else(
        |_| String::new(),
        |value| {
            // Re-collect the object into a sorted map so key order never
            // depends on struct declaration order.
            let sorted: std::collections::BTreeMap<String, serde_json::Value> = match value {
                serde_json::Value::Object(map) => map.into_iter().collect(),
                other => return other.to_string(),
            };
            serde_json::to_string(&sorted).unwrap_or_default()
        },
    );

    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Key-value store with lazy TTL eviction.
///
/// Eviction happens only on `get`: entries that are never read again stay
/// in memory until `clear`. No background sweeper. Two concurrent misses
/// on the same key may both fetch and both write; last writer wins.
pub struct SearchCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> SearchCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached value if present and younger than the TTL,
    /// evicting it otherwise.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                debug!("Evicting stale cache entry {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key` with the current instant, overwriting
    /// any prior entry.
    pub fn set(&self, key: &str, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                CacheEntry {
                    value,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
