//! Response cache domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default time-to-live for cached responses.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);

/// A persisted response for an (endpoint, fingerprint) key.
///
/// Entries are append-only; a newer entry for the same key shadows older
/// ones and nothing is ever updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub endpoint: String,
    pub fingerprint: String,
    pub response: Value,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(endpoint: impl Into<String>, fingerprint: impl Into<String>, response: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            fingerprint: fingerprint.into(),
            response,
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether the entry is still live at `now` for the given maximum age.
    ///
    /// An entry exactly `max_age` old is expired. Entries stamped in the
    /// future (clock skew) count as age zero.
    pub fn is_live_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        let age = (now - self.created_at).to_std().unwrap_or(Duration::ZERO);
        age < max_age
    }
}

/// Entry counts for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCacheStats {
    pub endpoint: String,
    pub total_entries: u64,
    pub live_entries: u64,
}
