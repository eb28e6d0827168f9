//! Durability and concurrency of the SQLite response cache.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use cropwise::adapters::sqlite::{initialize_database, SqliteResponseCache};
use cropwise::domain::ports::ResponseCache;
use cropwise::services::{fingerprint, CachedResponder, Computed};
use cropwise::{MarketQuote, MarketRequest};

const DAY: Duration = Duration::from_secs(24 * 3600);

#[tokio::test]
async fn test_entries_survive_reopen() {
    let (_dir, db_path) = common::temp_db_path();
    let url = format!("sqlite:{}", db_path.display());
    let fp = fingerprint("market", &json!({"crop": "Rice"}));

    let pool = initialize_database(&url, None).await.expect("open database");
    SqliteResponseCache::new(pool.clone())
        .put("market", &fp, &json!({"crop": "Rice", "price": 60.0}))
        .await
        .expect("put");
    pool.close().await;

    let reopened = initialize_database(&url, None).await.expect("reopen database");
    let cached = SqliteResponseCache::new(reopened)
        .get("market", &fp, DAY)
        .await
        .expect("get");

    assert_eq!(cached, Some(json!({"crop": "Rice", "price": 60.0})));
}

#[tokio::test]
async fn test_responder_serves_from_disk_after_restart() {
    let (_dir, db_path) = common::temp_db_path();
    let url = format!("sqlite:{}", db_path.display());
    let request = MarketRequest { crop: "Wheat".to_string() };

    let pool = initialize_database(&url, None).await.expect("open database");
    let responder = CachedResponder::new(Arc::new(SqliteResponseCache::new(pool.clone())));
    let first: MarketQuote = responder
        .respond("market", &request, || async {
            Ok(Computed::cacheable(MarketQuote {
                crop: "Wheat".to_string(),
                market_price: 55.0,
            }))
        })
        .await
        .expect("first response");
    pool.close().await;

    let pool = initialize_database(&url, None).await.expect("reopen database");
    let responder = CachedResponder::new(Arc::new(SqliteResponseCache::new(pool)));
    let second: MarketQuote = responder
        .respond("market", &request, || async {
            Ok(Computed::cacheable(MarketQuote {
                crop: "Wheat".to_string(),
                market_price: -1.0,
            }))
        })
        .await
        .expect("second response");

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_writers_on_file_database() {
    let (_dir, db_path) = common::temp_db_path();
    let url = format!("sqlite:{}", db_path.display());
    let pool = initialize_database(&url, None).await.expect("open database");
    let cache = SqliteResponseCache::new(pool.clone());

    let mut handles = Vec::new();
    for i in 0..10 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache
                .put("chat", &format!("fp-{}", i % 3), &json!({"n": i}))
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("put");
    }

    assert_eq!(common::cached_rows(&pool, "chat").await, 10);
    for key in ["fp-0", "fp-1", "fp-2"] {
        assert!(cache.get("chat", key, DAY).await.expect("get").is_some());
    }
}
