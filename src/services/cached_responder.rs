//! Cache-aside responder shared by every cached endpoint.
//!
//! A request is fingerprinted, served from the response cache while a live
//! entry exists, and computed otherwise. Only results the computation marks
//! as cacheable are written back.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use super::fingerprint::fingerprint_of;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DEFAULT_CACHE_TTL;
use crate::domain::ports::ResponseCache;

/// Result of a computation and whether it may be cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed<T> {
    pub value: T,
    pub cacheable: bool,
}

impl<T> Computed<T> {
    pub const fn cacheable(value: T) -> Self {
        Self { value, cacheable: true }
    }

    /// A result derived from degraded upstream data.
    pub const fn uncacheable(value: T) -> Self {
        Self { value, cacheable: false }
    }
}

type FlightMap = Mutex<HashMap<String, Weak<AsyncMutex<()>>>>;

pub struct CachedResponder {
    cache: Arc<dyn ResponseCache>,
    ttl: Duration,
    in_flight: Option<FlightMap>,
}

impl CachedResponder {
    pub fn new(cache: Arc<dyn ResponseCache>) -> Self {
        Self {
            cache,
            ttl: DEFAULT_CACHE_TTL,
            in_flight: Some(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enable or disable per-fingerprint request collapsing.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Mutex::new(HashMap::new()));
        self
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serve `payload` from cache or run `compute`.
    pub async fn respond<P, T, F, Fut>(&self, endpoint: &str, payload: &P, compute: F) -> DomainResult<T>
    where
        P: Serialize,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<Computed<T>>>,
    {
        let fingerprint = fingerprint_of(endpoint, payload)?;

        if let Some(hit) = self.lookup(endpoint, &fingerprint).await? {
            return Ok(hit);
        }

        let flight = self.flight_lock(endpoint, &fingerprint);
        let _guard = match &flight {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        if flight.is_some() {
            // another request for the same key may have finished while we waited
            if let Some(hit) = self.lookup(endpoint, &fingerprint).await? {
                return Ok(hit);
            }
        }

        let computed = compute().await?;
        if computed.cacheable {
            let response = serde_json::to_value(&computed.value)?;
            self.cache.put(endpoint, &fingerprint, &response).await?;
            tracing::debug!(endpoint, fingerprint = %fingerprint, "cached response");
        } else {
            tracing::info!(endpoint, fingerprint = %fingerprint, "response not cached");
        }

        Ok(computed.value)
    }

    async fn lookup<T: DeserializeOwned>(&self, endpoint: &str, fingerprint: &str) -> DomainResult<Option<T>> {
        let cached = match self.cache.get(endpoint, fingerprint, self.ttl).await {
            Ok(cached) => cached,
            Err(DomainError::SerializationError(e)) => {
                tracing::warn!(endpoint, fingerprint, error = %e, "undecodable cache entry, treating as miss");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let Some(value) = cached else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(hit) => {
                tracing::debug!(endpoint, fingerprint, "cache hit");
                Ok(Some(hit))
            }
            Err(e) => {
                tracing::warn!(endpoint, fingerprint, error = %e, "cache entry has unexpected shape, treating as miss");
                Ok(None)
            }
        }
    }

    fn flight_lock(&self, endpoint: &str, fingerprint: &str) -> Option<Arc<AsyncMutex<()>>> {
        let flights = self.in_flight.as_ref()?;
        let mut flights = flights.lock().unwrap_or_else(PoisonError::into_inner);
        flights.retain(|_, lock| lock.strong_count() > 0);

        let key = format!("{endpoint}\n{fingerprint}");
        if let Some(existing) = flights.get(&key).and_then(Weak::upgrade) {
            return Some(existing);
        }

        let lock = Arc::new(AsyncMutex::new(()));
        flights.insert(key, Arc::downgrade(&lock));
        Some(lock)
    }
}
