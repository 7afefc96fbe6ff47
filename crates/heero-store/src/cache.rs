use std::time::Duration;

use heero_core::LocationRecord;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::LOCATIONS_CACHE_KEY;

/// Last successful load, stamped with the wall-clock time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub data: Vec<LocationRecord>,
}

impl CacheEntry {
    #[must_use]
    pub fn new(timestamp: i64, data: Vec<LocationRecord>) -> Self {
        Self { timestamp, data }
    }

    #[must_use]
    pub fn age(&self, now_ms: i64) -> Duration {
        let millis = u64::try_from(now_ms.saturating_sub(self.timestamp)).unwrap_or(0);
        Duration::from_millis(millis)
    }

    /// An entry stamped in the future counts as fresh.
    #[must_use]
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        self.age(now_ms) < ttl
    }
}

#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Read the cached locations. Missing, unreadable or malformed entries are a
/// miss.
pub fn read_cache(store: &dyn KeyValueStore) -> Option<CacheEntry> {
    match try_read(store) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(key = LOCATIONS_CACHE_KEY, error = %e, "ignoring unreadable location cache");
            None
        }
    }
}

/// Persist a load. Failures are logged and otherwise ignored.
pub fn write_cache(store: &dyn KeyValueStore, entry: &CacheEntry) {
    let result = serde_json::to_string(entry)
        .map_err(StoreError::from)
        .and_then(|json| store.set(LOCATIONS_CACHE_KEY, &json));
    match result {
        Ok(()) => tracing::debug!(
            key = LOCATIONS_CACHE_KEY,
            records = entry.data.len(),
            "location cache written"
        ),
        Err(e) => {
            tracing::warn!(key = LOCATIONS_CACHE_KEY, error = %e, "failed to write location cache");
        }
    }
}

fn try_read(store: &dyn KeyValueStore) -> Result<Option<CacheEntry>, StoreError> {
    let Some(text) = store.get(LOCATIONS_CACHE_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&text)?))
}
