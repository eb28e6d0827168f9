//! SQLite implementation of the ResponseCache.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use std::time::Duration;

use super::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CacheEntry, EndpointCacheStats};
use crate::domain::ports::ResponseCache;

/// Append-only response store backed by the `response_cache` table.
#[derive(Clone)]
pub struct SqliteResponseCache {
    pool: SqlitePool,
}

impl SqliteResponseCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a fully formed entry, keeping its timestamp.
    pub async fn insert_entry(&self, entry: &CacheEntry) -> DomainResult<()> {
        let response_json = serde_json::to_string(&entry.response)?;

        sqlx::query(
            "INSERT INTO response_cache (endpoint, fingerprint, response, created_at) VALUES (?, ?, ?, ?)"
        )
        .bind(&entry.endpoint)
        .bind(&entry.fingerprint)
        .bind(&response_json)
        .bind(format_timestamp(entry.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent entry for the key regardless of age.
    pub async fn latest_entry(&self, endpoint: &str, fingerprint: &str) -> DomainResult<Option<CacheEntry>> {
        let row: Option<CacheRow> = sqlx::query_as(
            r#"SELECT endpoint, fingerprint, response, created_at FROM response_cache
               WHERE endpoint = ? AND fingerprint = ?
               ORDER BY created_at DESC, id DESC LIMIT 1"#
        )
        .bind(endpoint)
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CacheEntry::try_from).transpose()
    }

    /// Entry counts per endpoint, with live entries measured against `max_age`.
    pub async fn stats(&self, max_age: Duration) -> DomainResult<Vec<EndpointCacheStats>> {
        let max_age = chrono::Duration::from_std(max_age)
            .map_err(|e| DomainError::ValidationFailed(format!("max age out of range: {e}")))?;
        let cutoff = format_timestamp(Utc::now() - max_age);

        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            r#"SELECT endpoint, COUNT(*), COALESCE(SUM(CASE WHEN created_at > ? THEN 1 ELSE 0 END), 0)
               FROM response_cache GROUP BY endpoint ORDER BY endpoint"#
        )
        .bind(&cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(endpoint, total, live)| EndpointCacheStats {
                endpoint,
                total_entries: total.max(0) as u64,
                live_entries: live.max(0) as u64,
            })
            .collect())
    }
}

#[async_trait]
impl ResponseCache for SqliteResponseCache {
    async fn put(&self, endpoint: &str, fingerprint: &str, response: &Value) -> DomainResult<()> {
        self.insert_entry(&CacheEntry::new(endpoint, fingerprint, response.clone())).await
    }

    async fn get(&self, endpoint: &str, fingerprint: &str, max_age: Duration) -> DomainResult<Option<Value>> {
        let entry = self.latest_entry(endpoint, fingerprint).await?;
        let now = Utc::now();
        Ok(entry.filter(|e| e.is_live_at(now, max_age)).map(|e| e.response))
    }
}

/// Fixed-width UTC timestamps so lexical order matches chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(sqlx::FromRow)]
struct CacheRow {
    endpoint: String,
    fingerprint: String,
    response: String,
    created_at: String,
}

impl TryFrom<CacheRow> for CacheEntry {
    type Error = DomainError;

    fn try_from(row: CacheRow) -> Result<Self, Self::Error> {
        let response: Value = serde_json::from_str(&row.response)?;
        Ok(CacheEntry {
            endpoint: row.endpoint,
            fingerprint: row.fingerprint,
            response,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
