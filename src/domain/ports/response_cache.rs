//! Response cache port.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::domain::errors::DomainResult;

/// Durable store of prior responses keyed by (endpoint, fingerprint).
///
/// The store is append-only. `put` never overwrites; `get` looks at the most
/// recent entry for the key and returns it only while it is younger than
/// `max_age`. Expired entries stay in storage and are simply ignored.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Append a response stamped with the current time.
    async fn put(&self, endpoint: &str, fingerprint: &str, response: &Value) -> DomainResult<()>;

    /// Most recent live response for the key, if any.
    async fn get(&self, endpoint: &str, fingerprint: &str, max_age: Duration) -> DomainResult<Option<Value>>;
}
